//! wikirag - Wikipedia-grounded answers from a local model
//!
//! Answers a question by searching Wikipedia, fetching the introductions of
//! the top hits, packing them into a bounded context and asking a text
//! generation backend (Ollama over HTTP, or a local executable).
//!
//! # Architecture
//!
//! - **wiki**: search and extract clients for the MediaWiki API
//! - **rag**: context assembly, prompt template and the per-question pipeline
//! - **generation**: pluggable generation backends
//! - **cli** / **repl** / **execution**: the command-line surface

pub mod errors;

pub use errors::{ContentError, GenerationError, RagError, Result, SearchError};

pub mod generation;
pub mod rag;
pub mod wiki;

pub mod cli;
pub mod repl;
pub mod telemetry;

// Shared execution logic for single-shot and interactive modes
pub mod execution;
