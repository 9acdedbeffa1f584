use std::collections::HashMap;

use super::SelectionStrategy;
use crate::error::Result;
use crate::frequency::aggregate;
use crate::models::{Draw, GameRules, Scores};

/// Scores every number by its raw occurrence count over the window.
pub struct FrequencyStrategy;

impl SelectionStrategy for FrequencyStrategy {
    fn name(&self) -> &str {
        "Frequency"
    }

    fn score(&self, history: &[Draw], rules: &GameRules) -> Result<Scores> {
        let frequency = aggregate(history, rules.domain_size)?;
        Ok(Scores::from_frequency(&frequency))
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::new()
    }
}
