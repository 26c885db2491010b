//! Interactive question loop
//!
//! Reads questions until `exit`, Ctrl-D or Ctrl-C. A failed question is
//! reported and the loop keeps going.

pub mod display;
pub mod input;

use anyhow::Result;

pub use crate::repl::display::DisplayManager;
pub use crate::repl::input::{InputHandler, ReplInput};

use crate::cli::Verbosity;
use crate::execution::execute_question;
use crate::rag::RagPipeline;

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Outcome counters for one interactive session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub answered: usize,
    pub failed: usize,
}

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    verbosity: Verbosity,
    stats: SessionStats,
}

impl ReplSession {
    /// Create a session, with persistent history when a home directory exists
    pub fn new(verbosity: Verbosity) -> Result<Self> {
        let input_handler = match InputHandler::default_history_path() {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };

        Ok(ReplSession {
            input_handler,
            verbosity,
            stats: SessionStats::default(),
        })
    }

    /// Read and answer questions until the user leaves
    pub async fn run(&mut self, pipeline: &RagPipeline) -> Result<SessionStats> {
        loop {
            let line = match self.input_handler.read_line()? {
                Some(line) => line,
                None => break,
            };

            if handle_line(pipeline, &line, self.verbosity, &mut self.stats).await
                == LoopControl::Exit
            {
                println!("Goodbye!");
                break;
            }
        }

        if let Err(e) = self.input_handler.save_history() {
            tracing::warn!(error = %e, "failed to save history");
        }

        Ok(self.stats)
    }
}

/// Process one input line
pub async fn handle_line(
    pipeline: &RagPipeline,
    line: &str,
    verbosity: Verbosity,
    stats: &mut SessionStats,
) -> LoopControl {
    match ReplInput::parse(line) {
        ReplInput::Empty => LoopControl::Continue,
        ReplInput::Exit => LoopControl::Exit,
        ReplInput::Question(question) => {
            match execute_question(pipeline, &question, verbosity).await {
                Ok(_) => stats.answered += 1,
                Err(_) => stats.failed += 1,
            }
            LoopControl::Continue
        }
    }
}
