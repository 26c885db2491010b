//! Wire types for the MediaWiki action API

use serde::Deserialize;
use std::collections::HashMap;

/// `list=search` response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: Option<SearchQuery>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

/// One search hit; the snippet is HTML-highlighted and only used for logging
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// `prop=extracts` response
///
/// Pages are keyed by page ID. The map has no meaningful order.
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub pages: HashMap<String, Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub extract: Option<String>,
    /// Present (as an empty string) when the title does not exist
    #[serde(default)]
    pub missing: Option<serde_json::Value>,
    #[serde(default)]
    pub invalid: Option<serde_json::Value>,
}

impl Page {
    /// Whether the API flagged this entry as a non-existent or invalid title
    pub fn is_missing(&self) -> bool {
        self.missing.is_some() || self.invalid.is_some()
    }
}

/// Top-level `error` object the API returns with a 200 status
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}
