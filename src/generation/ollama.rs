//! Ollama HTTP backend
//!
//! Endpoint: POST /api/generate with `stream: false`, so the full answer
//! arrives in a single JSON object.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{clip_body, GenerationError};
use crate::generation::{Answer, Generator};

/// Default Ollama host
pub const DEFAULT_OLLAMA_HOST: &str = "127.0.0.1";

/// Default Ollama port
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Ollama generation client
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GenerationError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Check if Ollama is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_transport(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            GenerationError::Http(e)
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Answer, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        tracing::debug!(%url, model, prompt_chars = prompt.chars().count(), "ollama request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: clip_body(&body),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Parse {
                message: e.to_string(),
                body: clip_body(&body),
            })?;

        if let Some(message) = parsed.error {
            return Err(GenerationError::Api { message });
        }

        let text = parsed.response.ok_or_else(|| GenerationError::Parse {
            message: "missing field `response`".to_string(),
            body: clip_body(&body),
        })?;

        if !parsed.done {
            tracing::warn!(model, "ollama reported an unfinished response");
        }

        Ok(Answer {
            text,
            streamed: false,
        })
    }

    fn describe(&self) -> String {
        format!("Ollama at {}", self.base_url)
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama non-streamed generate response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}
