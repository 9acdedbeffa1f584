use thiserror::Error;

/// Errors raised by the selection pipeline and by draw sources.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Malformed draw {index}: {reason}")]
    MalformedDraw { index: u32, reason: String },

    #[error("Draw {0} not found")]
    DrawNotFound(u32),

    #[error("Draw source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid pool size {pool_size}: must be between the play size ({play_size}) and the domain size ({domain_size})")]
    InvalidPoolSize {
        pool_size: usize,
        play_size: usize,
        domain_size: usize,
    },

    #[error("Cannot sample plays of {play_size} numbers from a pool of {pool_len}")]
    ImpossibleSample { play_size: usize, pool_len: usize },

    #[error("Insufficient data: {needed} required, {available} available")]
    InsufficientData { needed: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate candidate {0} in pool")]
    DuplicateCandidate(u8),

    #[error("Invalid score {score} for number {number}")]
    InvalidScore { number: u8, score: f64 },
}

impl CoreError {
    pub fn malformed(index: u32, reason: impl Into<String>) -> Self {
        CoreError::MalformedDraw {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
