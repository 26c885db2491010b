//! Text generation backends
//!
//! The pipeline talks to a [`Generator`]; configuration picks the concrete
//! backend:
//! - [`OllamaGenerator`]: `POST /api/generate` with `stream: false`
//! - [`CommandGenerator`]: a local executable receiving the prompt as its
//!   last argument, with stdout/stderr inherited

pub mod command;
pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use command::CommandGenerator;
pub use ollama::{OllamaGenerator, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT};

use crate::errors::GenerationError;

/// Default model name
pub const DEFAULT_MODEL: &str = "llama2";

/// Placeholder in `command_args` replaced by the model name
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Text produced by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    /// True when the backend already wrote its output to the console
    pub streamed: bool,
}

impl Answer {
    /// Answer text with surrounding whitespace removed, as displayed
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// A backend able to turn a prompt into an answer
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for `prompt` using the model or target `model`
    async fn generate(&self, prompt: &str, model: &str) -> Result<Answer, GenerationError>;

    /// Short backend description for progress output
    fn describe(&self) -> String;

    /// True when the backend writes its answer straight to the console
    fn streams_to_console(&self) -> bool {
        false
    }
}

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Ollama,
    Command,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" | "http" => Ok(Backend::Ollama),
            "command" | "cmd" | "exec" => Ok(Backend::Command),
            other => Err(format!(
                "unknown backend '{}' (expected 'ollama' or 'command')",
                other
            )),
        }
    }
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub timeout_secs: u64,
    /// Executable for the command backend
    pub command_program: String,
    /// Arguments placed before the prompt; `{model}` is substituted
    pub command_args: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Ollama,
            host: DEFAULT_OLLAMA_HOST.to_string(),
            port: DEFAULT_OLLAMA_PORT,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 300,
            command_program: "ollama".to_string(),
            command_args: vec!["run".to_string(), MODEL_PLACEHOLDER.to_string()],
        }
    }
}

impl GenerationConfig {
    /// Base URL of the Ollama server
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Construct the configured backend
pub fn build_generator(config: &GenerationConfig) -> Result<Box<dyn Generator>, GenerationError> {
    let generator: Box<dyn Generator> = match config.backend {
        Backend::Ollama => Box::new(OllamaGenerator::new(&config.ollama_url(), config.timeout())?),
        Backend::Command => Box::new(CommandGenerator::new(
            &config.command_program,
            config.command_args.clone(),
            config.timeout(),
        )),
    };

    tracing::debug!(backend = %generator.describe(), "generator ready");
    Ok(generator)
}
