pub mod config;
pub mod encoding;
pub mod error;
pub mod frequency;
pub mod models;
pub mod pipeline;
pub mod pool;
pub mod sampler;
pub mod source;
pub mod strategy;

pub use error::{CoreError, Result};
