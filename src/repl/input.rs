//! Input handler for the interactive loop using rustyline
//!
//! Line editing with persistent history.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Prompt shown before each question
const PROMPT: &str = "\n> ";

/// What a line of user input means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// Blank line, ignored
    Empty,
    /// `exit` or `quit`, any case
    Exit,
    Question(String),
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return ReplInput::Empty;
        }

        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" | "/exit" | "/quit" => ReplInput::Exit,
            _ => ReplInput::Question(trimmed.to_string()),
        }
    }
}

/// Input handler managing readline interface and command history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
        })
    }

    /// Create input handler with persistent history
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if history_file.exists() {
            if let Err(e) = editor.load_history(&history_file) {
                tracing::debug!(error = %e, "could not load history");
            }
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
        })
    }

    /// `~/.wikirag/history`
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".wikirag").join("history"))
    }

    /// Read a line of input from user
    ///
    /// Returns:
    /// - Ok(Some(input)) for normal input
    /// - Ok(None) for EOF (Ctrl-D) or interrupt (Ctrl-C)
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    if let Err(e) = self.editor.add_history_entry(trimmed) {
                        tracing::debug!(error = %e, "could not record history entry");
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank() {
        assert_eq!(ReplInput::parse(""), ReplInput::Empty);
        assert_eq!(ReplInput::parse("   \t"), ReplInput::Empty);
    }

    #[test]
    fn test_parse_exit_any_case() {
        assert_eq!(ReplInput::parse("exit"), ReplInput::Exit);
        assert_eq!(ReplInput::parse("  EXIT "), ReplInput::Exit);
        assert_eq!(ReplInput::parse("Quit"), ReplInput::Exit);
    }

    #[test]
    fn test_parse_question_trimmed() {
        assert_eq!(
            ReplInput::parse("  What is quantum computing?  "),
            ReplInput::Question("What is quantum computing?".to_string())
        );
        // only the bare word ends the session
        assert_eq!(
            ReplInput::parse("exit strategy"),
            ReplInput::Question("exit strategy".to_string())
        );
    }

    #[test]
    fn test_default_history_path() {
        if let Some(path) = InputHandler::default_history_path() {
            assert!(path.ends_with(".wikirag/history"));
        }
    }
}
