//! Configuration management for wikirag
//!
//! TOML file with defaults and validation.
//! Location: ~/.wikirag/config.toml (or `--config <path>`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::args::Args;
use crate::errors::ConfigError;
use crate::generation::GenerationConfig;
use crate::rag::PipelineConfig;
use crate::wiki::WikiConfig;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wikipedia: WikiConfig,
    pub retrieval: PipelineConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Load from `path`, or from the default location when it exists
    ///
    /// A missing default file is not an error; built-in defaults are used.
    /// Values are not validated here; call [`Config::validate`] once command-line
    /// overrides have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError(format!("Failed to parse config: {}", e)))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// `~/.wikirag/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".wikirag").join("config.toml"))
    }

    /// Apply command-line overrides on top of file values
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(model) = &args.model {
            self.generation.model = model.clone();
        }
        if let Some(host) = &args.host {
            self.generation.host = host.clone();
        }
        if let Some(port) = args.port {
            self.generation.port = port;
        }
        if let Some(backend) = args.backend {
            self.generation.backend = backend;
        }
        if let Some(endpoint) = &args.endpoint {
            self.wikipedia.endpoint = endpoint.clone();
        }
        if let Some(limit) = args.limit {
            self.retrieval.search_limit = limit;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wikipedia.endpoint.trim().is_empty() {
            return Err(ConfigError("wikipedia.endpoint must not be empty".to_string()));
        }

        if self.wikipedia.timeout_secs == 0 || self.generation.timeout_secs == 0 {
            return Err(ConfigError("timeouts must be greater than 0".to_string()));
        }

        if self.retrieval.search_limit == 0 {
            return Err(ConfigError("search_limit must be greater than 0".to_string()));
        }

        if self.retrieval.max_chars_per_article == 0 {
            return Err(ConfigError(
                "max_chars_per_article must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.concurrency == 0 {
            return Err(ConfigError("concurrency must be greater than 0".to_string()));
        }

        if self.generation.model.trim().is_empty() {
            return Err(ConfigError("generation.model must not be empty".to_string()));
        }

        if self.generation.command_program.trim().is_empty() {
            return Err(ConfigError(
                "generation.command_program must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Rendered TOML, for `wikirag config`
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
