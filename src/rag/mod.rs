//! Retrieval-augmented generation pipeline
//!
//! Components:
//! - context: bounded context assembly from fetched extracts
//! - prompt: fixed prompt template
//! - state: per-question state machine
//! - events: progress event bus
//! - pipeline: orchestration of one question

pub mod context;
pub mod events;
pub mod pipeline;
pub mod prompt;
pub mod state;

pub use context::{AssembledContext, ContextAssembler, RetrievedArticle};
pub use events::{EventBus, EventReceiver, PipelineEvent};
pub use pipeline::{ArticleSource, EmptyResultsPolicy, PipelineConfig, RagAnswer, RagPipeline};
pub use prompt::build_prompt;
pub use state::{PipelineState, StateEvent};
