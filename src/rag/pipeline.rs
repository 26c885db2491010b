//! End-to-end question answering: search -> retrieve -> assemble -> prompt -> generate
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ContentError, RagError, Result, SearchError};
use crate::generation::{Answer, Generator};
use crate::rag::context::{
    AssembledContext, ContextAssembler, RetrievedArticle, DEFAULT_MAX_CHARS_PER_ARTICLE,
};
use crate::rag::events::{EventBus, PipelineEvent};
use crate::rag::prompt::build_prompt;
use crate::rag::state::{PipelineState, StateEvent};

/// Where titles and article text come from
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Titles matching `query`, most relevant first
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<Vec<String>, SearchError>;

    /// Plain-text introduction of one article
    async fn fetch_content(&self, title: &str) -> std::result::Result<String, ContentError>;
}

/// What to do when the search finds nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultsPolicy {
    /// Stop with [`RagError::EmptyResults`]
    Fail,
    /// Ask the generator anyway, with an empty context
    AnswerWithoutContext,
}

/// Retrieval configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Titles requested from the search endpoint
    pub search_limit: usize,
    pub max_chars_per_article: usize,
    /// Article fetches in flight at once
    pub concurrency: usize,
    pub on_empty_results: EmptyResultsPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_limit: 3,
            max_chars_per_article: DEFAULT_MAX_CHARS_PER_ARTICLE,
            concurrency: 4,
            on_empty_results: EmptyResultsPolicy::Fail,
        }
    }
}

/// Result of one successful pipeline run
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub question: String,
    pub answer: Answer,
    /// Titles returned by the search, in rank order
    pub titles: Vec<String>,
    /// Titles whose content could not be fetched, with the reason
    pub failed: Vec<(String, String)>,
    pub context: AssembledContext,
    pub prompt: String,
    pub duration_ms: u64,
}

/// Orchestrates one question at a time
///
/// Holds no per-question state; every call to [`RagPipeline::answer`] owns
/// its data from start to finish.
pub struct RagPipeline {
    source: Arc<dyn ArticleSource>,
    generator: Arc<dyn Generator>,
    model: String,
    assembler: ContextAssembler,
    config: PipelineConfig,
}

impl RagPipeline {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        generator: Arc<dyn Generator>,
        model: impl Into<String>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            generator,
            model: model.into(),
            assembler: ContextAssembler::new(config.max_chars_per_article),
            config,
        }
    }

    /// Answer `question` from Wikipedia context
    ///
    /// Search and generation failures end the run with an error; individual
    /// article failures are logged and skipped.
    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        self.run(question, Run::new(None)).await
    }

    /// Same as [`RagPipeline::answer`], publishing progress on `bus`
    pub async fn answer_with_events(&self, question: &str, bus: &EventBus) -> Result<RagAnswer> {
        self.run(question, Run::new(Some(bus))).await
    }

    async fn run(&self, question: &str, mut run: Run<'_>) -> Result<RagAnswer> {
        let start = Instant::now();

        let question = question.trim();
        if question.is_empty() {
            return Err(run.fail(RagError::InvalidQuestion));
        }

        run.advance(StateEvent::Start);
        run.emit(PipelineEvent::Searching {
            query: question.to_string(),
        });

        let titles = match self.source.search(question, self.config.search_limit).await {
            Ok(titles) => titles,
            Err(e) => return Err(run.fail(e.into())),
        };
        tracing::info!(count = titles.len(), "search finished");

        if titles.is_empty() {
            match self.config.on_empty_results {
                EmptyResultsPolicy::Fail => {
                    return Err(run.fail(RagError::EmptyResults {
                        query: question.to_string(),
                    }));
                }
                EmptyResultsPolicy::AnswerWithoutContext => {
                    tracing::info!("no search results, answering without context");
                    run.emit(PipelineEvent::NoResultsFallback);
                }
            }
        } else {
            run.emit(PipelineEvent::TitlesFound {
                titles: titles.clone(),
            });
        }

        run.advance(StateEvent::TitlesReady);
        let articles = self.retrieve(&titles, &run).await;
        let failed: Vec<(String, String)> = articles
            .iter()
            .filter_map(|a| match &a.content {
                Err(e) => Some((a.title.clone(), e.to_string())),
                Ok(_) => None,
            })
            .collect();

        run.advance(StateEvent::ContentsReady);
        let context = self.assembler.assemble(&articles);
        run.emit(PipelineEvent::ContextAssembled {
            articles: context.article_count(),
            truncated: context.truncated,
        });
        let prompt = build_prompt(question, &context);

        run.advance(StateEvent::ContextReady);
        let streams = self.generator.streams_to_console();
        let generating = PipelineEvent::Generating {
            backend: self.generator.describe(),
            streams,
        };
        if streams {
            // the backend writes to the console next; let progress output land first
            run.emit_and_wait(generating).await;
        } else {
            run.emit(generating);
        }
        let answer = match self.generator.generate(&prompt, &self.model).await {
            Ok(answer) => answer,
            Err(e) => return Err(run.fail(e.into())),
        };

        run.advance(StateEvent::AnswerReady);
        let duration_ms = start.elapsed().as_millis() as u64;
        run.emit(PipelineEvent::Completed { duration_ms });

        Ok(RagAnswer {
            question: question.to_string(),
            answer,
            titles,
            failed,
            context,
            prompt,
            duration_ms,
        })
    }

    /// Fetch every title with bounded concurrency, keeping search order
    async fn retrieve(&self, titles: &[String], run: &Run<'_>) -> Vec<RetrievedArticle> {
        let concurrency = self.config.concurrency.max(1);

        stream::iter(titles.iter().cloned())
            .map(|title| async move {
                run.emit(PipelineEvent::Retrieving {
                    title: title.clone(),
                });

                let content = self.source.fetch_content(&title).await;
                if let Err(e) = &content {
                    tracing::warn!(title = %title, error = %e, "article retrieval failed");
                    run.emit(PipelineEvent::RetrievalFailed {
                        title: title.clone(),
                        error: e.to_string(),
                    });
                }

                RetrievedArticle::new(title, content)
            })
            .buffered(concurrency)
            .collect()
            .await
    }
}

/// State owned by a single pipeline run
struct Run<'a> {
    state: PipelineState,
    events: Option<&'a EventBus>,
}

impl<'a> Run<'a> {
    fn new(events: Option<&'a EventBus>) -> Self {
        Self {
            state: PipelineState::Idle,
            events,
        }
    }

    fn advance(&mut self, event: StateEvent) {
        match self.state.transition(event) {
            Ok(next) => {
                tracing::debug!(from = ?self.state, to = ?next, "pipeline transition");
                self.state = next;
            }
            Err(e) => tracing::error!(error = %e, "pipeline state machine out of sync"),
        }
    }

    fn fail(&mut self, err: RagError) -> RagError {
        self.advance(StateEvent::Fail);
        tracing::warn!(stage = err.stage(), error = %err, "question failed");
        self.emit(PipelineEvent::Failed {
            stage: err.stage().to_string(),
            error: err.to_string(),
        });
        err
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(bus) = self.events {
            bus.emit(event);
        }
    }

    async fn emit_and_wait(&self, event: PipelineEvent) {
        if let Some(bus) = self.events {
            bus.emit_and_wait(event).await;
        }
    }
}
