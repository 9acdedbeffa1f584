use std::path::Path;

use lotofacil_core::error::{CoreError, Result};
use lotofacil_core::models::{Draw, GameRules};
use lotofacil_core::source::{DrawSource, MemorySource};

use crate::payload::DrawPayload;

/// Offline source: a JSON array of API payloads, e.g. saved from `/lotofacil`.
pub struct JsonFileSource {
    inner: MemorySource,
}

impl JsonFileSource {
    pub fn open(path: &Path, rules: &GameRules) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::SourceUnavailable(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_json(&json, rules)
    }

    pub fn from_json(json: &str, rules: &GameRules) -> Result<Self> {
        let payloads: Vec<DrawPayload> = serde_json::from_str(json)
            .map_err(|e| CoreError::SourceUnavailable(format!("Invalid history JSON: {e}")))?;
        let draws = payloads
            .into_iter()
            .map(|p| p.into_draw(rules))
            .collect::<Result<Vec<_>>>()?;
        log::info!("{} draws loaded from history file", draws.len());
        Ok(Self {
            inner: MemorySource::new(draws)?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl DrawSource for JsonFileSource {
    fn latest_index(&self) -> Result<u32> {
        self.inner.latest_index()
    }

    fn fetch_draw(&self, index: u32) -> Result<Draw> {
        self.inner.fetch_draw(index)
    }
}
