use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::{CoreError, Result};
use crate::models::{GameRules, MAX_DOMAIN_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Frequency,
    Model,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Frequency => write!(f, "frequency"),
            StrategyKind::Model => write!(f, "model"),
        }
    }
}

/// Hyper-parameters of the next-draw classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub hidden_units: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub validation_split: f64,
    pub encoding: Encoding,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hidden_units: 32,
            epochs: 100,
            batch_size: 32,
            learning_rate: 1e-3,
            validation_split: 0.2,
            encoding: Encoding::Normalized,
            seed: 42,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden_units == 0 {
            return Err(CoreError::InvalidConfig("hidden_units must be positive".into()));
        }
        if self.epochs == 0 {
            return Err(CoreError::InvalidConfig("epochs must be positive".into()));
        }
        if self.batch_size == 0 {
            return Err(CoreError::InvalidConfig("batch_size must be positive".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(CoreError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(CoreError::InvalidConfig(format!(
                "validation_split must lie in [0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}

/// Everything a run of the pipeline needs besides the draws themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub domain_size: usize,
    pub draw_size: usize,
    pub play_cardinality: usize,
    pub pool_size: usize,
    pub window_size: usize,
    pub play_count: usize,
    pub strategy: StrategyKind,
    pub model: ModelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            domain_size: GameRules::LOTOFACIL.domain_size,
            draw_size: GameRules::LOTOFACIL.draw_size,
            play_cardinality: 15,
            pool_size: 15,
            window_size: 10,
            play_count: 1,
            strategy: StrategyKind::Frequency,
            model: ModelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn rules(&self) -> GameRules {
        GameRules {
            domain_size: self.domain_size,
            draw_size: self.draw_size,
        }
    }

    /// Fail-fast checks run before any draw is fetched.
    pub fn validate(&self) -> Result<()> {
        if self.domain_size == 0 || self.domain_size > MAX_DOMAIN_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "domain_size must lie in 1..={}, got {}",
                MAX_DOMAIN_SIZE,
                self.domain_size
            )));
        }
        if self.draw_size == 0 || self.draw_size > self.domain_size {
            return Err(CoreError::InvalidConfig(format!(
                "draw_size must lie in 1..={}, got {}",
                self.domain_size, self.draw_size
            )));
        }
        if self.play_cardinality == 0 {
            return Err(CoreError::InvalidConfig("play_cardinality must be positive".into()));
        }
        if self.pool_size == 0
            || self.pool_size > self.domain_size
            || self.pool_size < self.play_cardinality
        {
            return Err(CoreError::InvalidPoolSize {
                pool_size: self.pool_size,
                play_size: self.play_cardinality,
                domain_size: self.domain_size,
            });
        }
        if self.window_size == 0 {
            return Err(CoreError::InvalidConfig("window_size must be positive".into()));
        }
        if self.play_count == 0 {
            return Err(CoreError::InvalidConfig("play_count must be positive".into()));
        }
        if self.strategy == StrategyKind::Model {
            self.model.validate()?;
            if self.window_size < 2 {
                return Err(CoreError::InsufficientData {
                    needed: 2,
                    available: self.window_size,
                });
            }
        }
        Ok(())
    }
}
