//! Error types for wikirag
//!
//! One enum per pipeline stage, plus [`RagError`] which tags the stage
//! that terminated a question.

use thiserror::Error;

/// Longest response body excerpt carried inside an error message
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors raised while querying the Wikipedia search endpoint
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport-level failure (DNS, connection refused, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("Wikipedia API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the expected JSON shape
    #[error("failed to parse JSON response: {message}. Body: {body}")]
    Parse { message: String, body: String },

    /// The API answered 200 but reported an error object
    #[error("Wikipedia API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("search request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Errors raised while fetching a single article's extract
///
/// These never terminate a question: the orchestrator logs them and
/// moves on to the next title.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Wikipedia API returned status {status}")]
    Status { status: u16 },

    #[error("failed to parse JSON: {message}")]
    Parse { message: String },

    /// No usable page came back for the title
    #[error("no content found for '{title}'")]
    NotFound { title: String },

    #[error("content request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Errors raised by a generation backend
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Ollama API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse Ollama response: {message}. Body: {body}")]
    Parse { message: String, body: String },

    /// Ollama answered with an `error` object instead of a response
    #[error("Ollama error: {message}")]
    Api { message: String },

    /// The generator executable could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The generator executable exited unsuccessfully; `None` when killed by a signal
    #[error("generator exited with {}", exit_description(.code))]
    Exit { code: Option<i32> },

    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Terminal failure of one question's pipeline run
#[derive(Error, Debug)]
pub enum RagError {
    #[error("question must not be empty")]
    InvalidQuestion,

    #[error("Wikipedia search failed: {0}")]
    Search(#[from] SearchError),

    #[error("no Wikipedia results found for '{query}'")]
    EmptyResults { query: String },

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl RagError {
    /// Pipeline stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            RagError::InvalidQuestion => "input",
            RagError::Search(_) | RagError::EmptyResults { .. } => "search",
            RagError::Generation(_) => "generation",
        }
    }
}

/// Configuration file problems
#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Clip a response body so error messages stay readable
pub fn clip_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_status_display() {
        let err = SearchError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_rag_error_names_stage() {
        let err = RagError::from(GenerationError::Exit { code: Some(2) });
        assert_eq!(err.stage(), "generation");
        assert!(err.to_string().starts_with("Generation failed"));
        assert!(err.to_string().contains("exit code 2"));

        let err = RagError::EmptyResults {
            query: "zzz".to_string(),
        };
        assert_eq!(err.stage(), "search");
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_exit_without_code() {
        let err = GenerationError::Exit { code: None };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_clip_body_counts_chars() {
        let body = "é".repeat(500);
        let clipped = clip_body(&body);
        assert_eq!(clipped.chars().count(), MAX_ERROR_BODY_CHARS);

        assert_eq!(clip_body("short"), "short");
    }
}
