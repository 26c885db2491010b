//! Shared HTTP plumbing for the MediaWiki action API

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default MediaWiki API endpoint
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Identifying client marker sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("wikirag/", env!("CARGO_PKG_VERSION"));

/// Wikipedia connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Full URL of `api.php`
    pub endpoint: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_WIKIPEDIA_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Thin wrapper over a configured `reqwest::Client`
///
/// Cloning is cheap; the search and content clients share one connection pool.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    config: WikiConfig,
}

impl WikiClient {
    pub fn new(config: WikiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Issue a GET against the endpoint and return status and raw body
    pub(crate) async fn get(
        &self,
        params: &[(&str, &str)],
    ) -> Result<(StatusCode, String), reqwest::Error> {
        tracing::trace!(endpoint = %self.config.endpoint, ?params, "wikipedia request");

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_secs.saturating_mul(1000)
    }
}
