//! Blocking client for the public Caixa results API
//! (`{base_url}/{game}/latest`, `{base_url}/{game}/{contest}`).

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use lotofacil_core::error::{CoreError, Result};
use lotofacil_core::models::{Draw, GameRules};
use lotofacil_core::source::DrawSource;

use crate::payload::DrawPayload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub game: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://loteriascaixa-api.herokuapp.com/api".to_string(),
            game: "lotofacil".to_string(),
            timeout_secs: 30,
        }
    }
}

pub struct CaixaClient {
    config: ApiConfig,
    rules: GameRules,
    client: reqwest::blocking::Client,
}

impl CaixaClient {
    pub fn new(config: ApiConfig, rules: GameRules) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("lotofacil/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::SourceUnavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            rules,
            client,
        })
    }

    pub fn latest_url(&self) -> String {
        format!("{}/{}/latest", self.base(), self.config.game)
    }

    pub fn draw_url(&self, index: u32) -> String {
        format!("{}/{}/{}", self.base(), self.config.game, index)
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Latest contest with its numbers.
    pub fn fetch_latest(&self) -> Result<Draw> {
        self.get_payload(&self.latest_url(), None)?
            .into_draw(&self.rules)
    }

    fn get_payload(&self, url: &str, index: Option<u32>) -> Result<DrawPayload> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CoreError::SourceUnavailable(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, index, url));
        }

        response
            .json::<DrawPayload>()
            .map_err(|e| CoreError::malformed(index.unwrap_or(0), format!("invalid JSON from {url}: {e}")))
    }
}

fn status_error(status: StatusCode, index: Option<u32>, url: &str) -> CoreError {
    match index {
        Some(index) if status == StatusCode::NOT_FOUND => CoreError::DrawNotFound(index),
        _ => CoreError::SourceUnavailable(format!("{url} returned {status}")),
    }
}

impl DrawSource for CaixaClient {
    fn latest_index(&self) -> Result<u32> {
        Ok(self.fetch_latest()?.index())
    }

    fn fetch_draw(&self, index: u32) -> Result<Draw> {
        self.get_payload(&self.draw_url(index), Some(index))?
            .into_draw(&self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CaixaClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        CaixaClient::new(config, GameRules::LOTOFACIL).unwrap()
    }

    #[test]
    fn test_urls() {
        let c = client("https://example.org/api/");
        assert_eq!(c.latest_url(), "https://example.org/api/lotofacil/latest");
        assert_eq!(c.draw_url(3001), "https://example.org/api/lotofacil/3001");
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.game, "lotofacil");
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_not_found_maps_to_draw_not_found() {
        let err = status_error(StatusCode::NOT_FOUND, Some(99999), "u");
        assert!(matches!(err, CoreError::DrawNotFound(99999)));
    }

    #[test]
    fn test_other_status_is_unavailable() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, Some(1), "u");
        assert!(matches!(err, CoreError::SourceUnavailable(_)));
        let err = status_error(StatusCode::NOT_FOUND, None, "u");
        assert!(matches!(err, CoreError::SourceUnavailable(_)));
    }

    #[test]
    fn test_unreachable_host() {
        let c = client("http://127.0.0.1:9");
        assert!(matches!(c.latest_index(), Err(CoreError::SourceUnavailable(_))));
    }
}
