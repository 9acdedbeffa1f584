pub mod frequency;
pub mod model;

use std::collections::HashMap;

use crate::config::{AnalysisConfig, StrategyKind};
use crate::error::Result;
use crate::models::{Draw, GameRules, Scores};

pub use frequency::FrequencyStrategy;
pub use model::ModelStrategy;

pub trait SelectionStrategy {
    fn name(&self) -> &str;
    /// `history` is chronological (last element = most recent draw).
    /// Returns one non-negative score per number of the domain.
    fn score(&self, history: &[Draw], rules: &GameRules) -> Result<Scores>;
    fn params(&self) -> HashMap<String, f64>;
}

pub fn build_strategy(config: &AnalysisConfig) -> Box<dyn SelectionStrategy> {
    match config.strategy {
        StrategyKind::Frequency => Box::new(FrequencyStrategy),
        StrategyKind::Model => Box::new(ModelStrategy::new(config.model.clone())),
    }
}

#[cfg(test)]
pub(crate) fn validate_distribution(scores: &Scores, rules: &GameRules) -> bool {
    if scores.domain_size() != rules.domain_size {
        return false;
    }
    (scores.total() - 1.0).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_strategy_by_kind() {
        let config = AnalysisConfig::default();
        assert_eq!(build_strategy(&config).name(), "Frequency");

        let config = AnalysisConfig {
            strategy: StrategyKind::Model,
            ..Default::default()
        };
        let strategy = build_strategy(&config);
        assert_eq!(strategy.name(), "Model");
        assert_eq!(strategy.params()["hidden_units"], 32.0);
    }

    #[test]
    fn test_validate_distribution() {
        let rules = GameRules::LOTOFACIL;
        assert!(validate_distribution(&Scores::new(vec![0.04; 25]).unwrap(), &rules));
        assert!(!validate_distribution(&Scores::new(vec![0.04; 24]).unwrap(), &rules));
        assert!(!validate_distribution(&Scores::new(vec![1.0; 25]).unwrap(), &rules));
    }
}
