pub mod client;
pub mod file;
pub mod payload;

pub use client::{ApiConfig, CaixaClient};
pub use file::JsonFileSource;
pub use payload::DrawPayload;
