//! Bounded context assembly from retrieved article extracts
use serde::{Deserialize, Serialize};

use crate::errors::ContentError;

/// Default per-article character budget
pub const DEFAULT_MAX_CHARS_PER_ARTICLE: usize = 1000;

/// Appended to an extract that was cut short
pub const TRUNCATION_MARKER: &str = "...";

/// Outcome of fetching one search hit, kept at its search rank
#[derive(Debug)]
pub struct RetrievedArticle {
    pub title: String,
    pub content: Result<String, ContentError>,
}

impl RetrievedArticle {
    pub fn new(title: impl Into<String>, content: Result<String, ContentError>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }
}

/// Assembled context for prompt construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The formatted context text
    pub text: String,
    /// Titles included, in search order
    pub titles: Vec<String>,
    /// How many of the included extracts were truncated
    pub truncated: usize,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn article_count(&self) -> usize {
        self.titles.len()
    }
}

/// Turns retrieved articles into one bounded text block
///
/// Never fails: failed retrievals are skipped and an empty input gives an
/// empty context.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_chars_per_article: usize,
}

impl ContextAssembler {
    pub fn new(max_chars_per_article: usize) -> Self {
        Self {
            max_chars_per_article,
        }
    }

    /// Build the context; block numbers are 1-based search ranks
    pub fn assemble(&self, articles: &[RetrievedArticle]) -> AssembledContext {
        let mut context = AssembledContext::default();

        for (idx, article) in articles.iter().enumerate() {
            let content = match &article.content {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!(title = %article.title, error = %e, "skipping article");
                    continue;
                }
            };

            let (body, truncated) = truncate_chars(content, self.max_chars_per_article);
            if truncated {
                context.truncated += 1;
            }

            context.text.push_str(&format_block(idx + 1, &article.title, &body));
            context.titles.push(article.title.clone());
        }

        context
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS_PER_ARTICLE)
    }
}

fn format_block(rank: usize, title: &str, body: &str) -> String {
    format!("\n--- Article {}: {} ---\n{}\n", rank, title, body)
}

/// Cut `text` to at most `max_chars` characters, appending the marker when cut
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            (cut, true)
        }
        None => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(title: &str, text: &str) -> RetrievedArticle {
        RetrievedArticle::new(title, Ok(text.to_string()))
    }

    fn missing(title: &str) -> RetrievedArticle {
        RetrievedArticle::new(
            title,
            Err(ContentError::NotFound {
                title: title.to_string(),
            }),
        )
    }

    #[test]
    fn test_empty_input_gives_empty_context() {
        let context = ContextAssembler::default().assemble(&[]);
        assert!(context.is_empty());
        assert_eq!(context.text, "");
        assert_eq!(context.truncated, 0);
    }

    #[test]
    fn test_blocks_in_search_order() {
        let context = ContextAssembler::default().assemble(&[
            ok("Quantum computing", "Uses qubits."),
            ok("Quantum algorithm", "Runs on a quantum computer."),
        ]);

        assert_eq!(
            context.text,
            "\n--- Article 1: Quantum computing ---\nUses qubits.\n\
             \n--- Article 2: Quantum algorithm ---\nRuns on a quantum computer.\n"
        );
        assert_eq!(context.titles, vec!["Quantum computing", "Quantum algorithm"]);
        assert!(!context.text.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_failed_articles_skipped() {
        let context = ContextAssembler::default().assemble(&[
            missing("Gone"),
            ok("Kept", "text"),
            missing("Also gone"),
        ]);

        assert_eq!(context.titles, vec!["Kept"]);
        assert_eq!(context.text.matches("--- Article").count(), 1);
        // rank is preserved even when earlier hits failed
        assert!(context.text.contains("Article 2: Kept"));
    }

    #[test]
    fn test_all_failed_gives_empty_context() {
        let context = ContextAssembler::default().assemble(&[missing("a"), missing("b")]);
        assert!(context.is_empty());
        assert_eq!(context.text, "");
    }

    #[test]
    fn test_truncation_adds_marker() {
        let long = "x".repeat(50);
        let context = ContextAssembler::new(10).assemble(&[ok("Long", &long)]);

        assert_eq!(context.truncated, 1);
        assert!(context.text.contains(&format!("{}{}", "x".repeat(10), TRUNCATION_MARKER)));
        assert!(!context.text.contains(&"x".repeat(11)));
    }

    #[test]
    fn test_exact_length_not_truncated() {
        let context = ContextAssembler::new(4).assemble(&[ok("Fits", "abcd")]);
        assert_eq!(context.truncated, 0);
        assert!(context.text.contains("\nabcd\n"));
    }

    #[test]
    fn test_truncation_is_char_based() {
        let (cut, truncated) = truncate_chars("日本語のテキスト", 3);
        assert!(truncated);
        assert_eq!(cut, "日本語...");
    }

    #[test]
    fn test_length_bound() {
        let max = 25;
        let articles: Vec<_> = (0..5)
            .map(|i| ok(&format!("Title {}", i), &"y".repeat(100 + i)))
            .collect();
        let context = ContextAssembler::new(max).assemble(&articles);

        let overhead: usize = articles
            .iter()
            .enumerate()
            .map(|(i, a)| format_block(i + 1, &a.title, "").chars().count())
            .sum();
        let bound = articles.len() * (max + TRUNCATION_MARKER.len()) + overhead;
        assert!(context.text.chars().count() <= bound);
        assert_eq!(context.truncated, 5);
    }
}
