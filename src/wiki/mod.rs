//! Wikipedia access: title search and intro extracts
//!
//! Both clients talk to the MediaWiki action API (`api.php`) through a shared
//! [`WikiClient`].

pub mod client;
pub mod content;
pub mod search;
pub mod types;

use async_trait::async_trait;

pub use client::{WikiClient, WikiConfig, DEFAULT_USER_AGENT, DEFAULT_WIKIPEDIA_URL};
pub use content::ContentClient;
pub use search::SearchClient;

use crate::errors::{ContentError, SearchError};
use crate::rag::pipeline::ArticleSource;

/// Wikipedia as an article source for the pipeline
#[derive(Debug, Clone)]
pub struct Wikipedia {
    search: SearchClient,
    content: ContentClient,
}

impl Wikipedia {
    pub fn new(config: WikiConfig) -> Result<Self, reqwest::Error> {
        let wiki = WikiClient::new(config)?;
        Ok(Self {
            search: SearchClient::new(wiki.clone()),
            content: ContentClient::new(wiki),
        })
    }
}

#[async_trait]
impl ArticleSource for Wikipedia {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        self.search.search(query, limit).await
    }

    async fn fetch_content(&self, title: &str) -> Result<String, ContentError> {
        self.content.fetch_content(title).await
    }
}
