//! Introductory extract retrieval via `prop=extracts`

use crate::errors::ContentError;
use crate::wiki::client::WikiClient;
use crate::wiki::types::{Page, PageResponse};
use std::cmp::Ordering;

/// Fetches the plain-text introduction of a single article
#[derive(Debug, Clone)]
pub struct ContentClient {
    wiki: WikiClient,
}

impl ContentClient {
    pub fn new(wiki: WikiClient) -> Self {
        Self { wiki }
    }

    /// Fetch the intro extract for exactly `title`
    ///
    /// The text is returned untouched; truncation happens during assembly.
    /// An existing page without an extract yields an empty string.
    pub async fn fetch_content(&self, title: &str) -> Result<String, ContentError> {
        let params = [
            ("action", "query"),
            ("titles", title),
            ("prop", "extracts"),
            ("explaintext", "true"),
            ("exintro", "true"),
            ("format", "json"),
            ("utf8", "1"),
        ];

        let (status, body) = self.wiki.get(&params).await.map_err(|e| {
            if e.is_timeout() {
                ContentError::Timeout {
                    timeout_ms: self.wiki.timeout_ms(),
                }
            } else {
                ContentError::Http(e)
            }
        })?;

        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
            });
        }

        parse_extract(title, &body)
    }
}

/// Pull the extract of the selected page out of a raw response body
pub(crate) fn parse_extract(title: &str, body: &str) -> Result<String, ContentError> {
    let response: PageResponse = serde_json::from_str(body).map_err(|e| ContentError::Parse {
        message: e.to_string(),
    })?;

    let pages = response.query.map(|q| q.pages).unwrap_or_default();
    if pages.len() > 1 {
        tracing::debug!(
            title,
            pages = pages.len(),
            "multiple pages returned, picking lowest page id"
        );
    }

    let page = select_page(pages.iter()).ok_or_else(|| ContentError::NotFound {
        title: title.to_string(),
    })?;

    Ok(page.extract.clone().unwrap_or_default())
}

/// Deterministic page choice: lowest numeric page ID among pages that exist
///
/// Non-numeric keys sort after all numeric ones, then lexicographically.
fn select_page<'a, I>(pages: I) -> Option<&'a Page>
where
    I: Iterator<Item = (&'a String, &'a Page)>,
{
    pages
        .filter(|(_, page)| !page.is_missing())
        .min_by(|(a, _), (b, _)| compare_page_ids(a, b))
        .map(|(_, page)| page)
}

fn compare_page_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_page() {
        let body = r#"{"query":{"pages":{"25220":{"pageid":25220,"title":"Quantum computing","extract":"A quantum computer..."}}}}"#;
        assert_eq!(
            parse_extract("Quantum computing", body).unwrap(),
            "A quantum computer..."
        );
    }

    #[test]
    fn test_multiple_pages_pick_lowest_id() {
        let body = r#"{"query":{"pages":{
            "900":{"title":"Late","extract":"late"},
            "1000":{"title":"Later","extract":"later"},
            "12":{"title":"Early","extract":"early"}}}}"#;
        for _ in 0..10 {
            assert_eq!(parse_extract("x", body).unwrap(), "early");
        }
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let body = r#"{"query":{"pages":{"-1":{"title":"Nope","missing":""}}}}"#;
        assert!(matches!(
            parse_extract("Nope", body),
            Err(ContentError::NotFound { ref title }) if title == "Nope"
        ));
    }

    #[test]
    fn test_no_pages_is_not_found() {
        assert!(matches!(
            parse_extract("Nope", r#"{"batchcomplete":""}"#),
            Err(ContentError::NotFound { .. })
        ));
    }

    #[test]
    fn test_page_without_extract_is_empty() {
        let body = r#"{"query":{"pages":{"7":{"title":"Stub"}}}}"#;
        assert_eq!(parse_extract("Stub", body).unwrap(), "");
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_extract("x", "not json"),
            Err(ContentError::Parse { .. })
        ));
    }

    #[test]
    fn test_compare_page_ids() {
        assert_eq!(compare_page_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_page_ids("10", "abc"), Ordering::Less);
        assert_eq!(compare_page_ids("b", "a"), Ordering::Greater);
    }
}
