//! Shared question execution for single-shot and interactive modes
//!
//! Runs the pipeline for one question while a background task renders its
//! progress events, then prints the answer or the error.

use crate::cli::Verbosity;
use crate::errors::RagError;
use crate::rag::{EventBus, RagAnswer, RagPipeline};
use crate::repl::DisplayManager;

/// Answer one question with live progress output
///
/// The error is returned after it has been displayed so the caller can pick
/// an exit code or keep looping.
pub async fn execute_question(
    pipeline: &RagPipeline,
    question: &str,
    verbosity: Verbosity,
) -> Result<RagAnswer, RagError> {
    let (bus, mut receiver) = EventBus::new();

    let printer = tokio::spawn(async move {
        let mut display = DisplayManager::new(verbosity);
        while let Some(event) = receiver.recv().await {
            display.show_event(&event);
        }
        display
    });

    let result = pipeline.answer_with_events(question, &bus).await;
    drop(bus);

    let mut display = match printer.await {
        Ok(display) => display,
        Err(e) => {
            tracing::warn!(error = %e, "progress printer stopped unexpectedly");
            DisplayManager::new(verbosity)
        }
    };

    match &result {
        Ok(answer) => display.show_answer(answer),
        Err(e) => display.show_error(&e.to_string()),
    }

    result
}
