//! Title search against `list=search`

use crate::errors::{clip_body, SearchError};
use crate::wiki::client::WikiClient;
use crate::wiki::types::SearchResponse;

/// Looks up article titles matching a free-text query
#[derive(Debug, Clone)]
pub struct SearchClient {
    wiki: WikiClient,
}

impl SearchClient {
    pub fn new(wiki: WikiClient) -> Self {
        Self { wiki }
    }

    /// Return up to `limit` titles in the service's relevance order
    ///
    /// Zero hits is an empty vector, not an error. The caller is expected to
    /// have filtered out blank queries.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let limit = limit.to_string();
        let params = [
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("format", "json"),
            ("srlimit", limit.as_str()),
            ("utf8", "1"),
        ];

        let (status, body) = self.wiki.get(&params).await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout {
                    timeout_ms: self.wiki.timeout_ms(),
                }
            } else {
                SearchError::Http(e)
            }
        })?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: clip_body(&body),
            });
        }

        parse_titles(&body)
    }
}

/// Extract ordered titles from a raw search response body
pub(crate) fn parse_titles(body: &str) -> Result<Vec<String>, SearchError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse {
            message: e.to_string(),
            body: clip_body(body),
        })?;

    if let Some(error) = response.error {
        return Err(SearchError::Api {
            code: error.code,
            info: error.info,
        });
    }

    let hits = response.query.map(|q| q.search).unwrap_or_default();
    for hit in &hits {
        tracing::trace!(title = %hit.title, snippet = %hit.snippet, "search hit");
    }

    Ok(hits.into_iter().map(|hit| hit.title).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_titles_keeps_order_and_duplicates() {
        let body = r#"{"query":{"search":[{"title":"B"},{"title":"A"},{"title":"B"}]}}"#;
        assert_eq!(parse_titles(body).unwrap(), vec!["B", "A", "B"]);
    }

    #[test]
    fn test_parse_titles_empty() {
        let body = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":0},"search":[]}}"#;
        assert!(parse_titles(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_titles_malformed() {
        let err = parse_titles("<html>oops</html>").unwrap_err();
        match err {
            SearchError::Parse { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_titles_api_error() {
        let body = r#"{"error":{"code":"maxlag","info":"Waiting for a database server"}}"#;
        assert!(matches!(
            parse_titles(body),
            Err(SearchError::Api { ref code, .. }) if code == "maxlag"
        ));
    }
}
