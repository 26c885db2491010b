//! Local executable backend
//!
//! Runs e.g. `ollama run <model> <prompt>` with the console streams inherited,
//! so the answer is printed by the child itself. Uses argv arrays only, never
//! a shell.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::errors::GenerationError;
use crate::generation::{Answer, Generator, MODEL_PLACEHOLDER};

/// Subprocess generation backend
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: &str, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args,
            timeout,
        }
    }

    /// Full argument vector for one invocation; the prompt is always last
    pub fn argv(&self, prompt: &str, model: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(MODEL_PLACEHOLDER, model))
            .chain(std::iter::once(prompt.to_string()))
            .collect()
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Answer, GenerationError> {
        let argv = self.argv(prompt, model);
        tracing::debug!(program = %self.program, args = argv.len(), "spawning generator");

        let mut cmd = Command::new(&self.program);
        cmd.args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| GenerationError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let waited = timeout(self.timeout, child.wait()).await;
        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(source)) => {
                return Err(GenerationError::Spawn {
                    program: self.program.clone(),
                    source,
                })
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "failed to kill timed out generator");
                }
                return Err(GenerationError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };

        if !status.success() {
            return Err(GenerationError::Exit {
                code: status.code(),
            });
        }

        Ok(Answer {
            text: String::new(),
            streamed: true,
        })
    }

    fn describe(&self) -> String {
        format!("command '{}'", self.program)
    }

    fn streams_to_console(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_substitutes_model_and_appends_prompt() {
        let generator = CommandGenerator::new(
            "ollama",
            vec!["run".to_string(), "{model}".to_string()],
            Duration::from_secs(1),
        );
        assert_eq!(
            generator.argv("What is Rust?", "mistral"),
            vec!["run", "mistral", "What is Rust?"]
        );
    }

    #[test]
    fn test_prompt_stays_single_argument() {
        let generator = CommandGenerator::new("echo", Vec::new(), Duration::from_secs(1));
        let argv = generator.argv("a b; rm -rf /", "m");
        assert_eq!(argv.len(), 1);
        assert_eq!(argv[0], "a b; rm -rf /");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_exit() {
        let generator = CommandGenerator::new("true", Vec::new(), Duration::from_secs(5));
        let answer = generator.generate("prompt", "m").await.unwrap();
        assert!(answer.streamed);
        assert!(answer.text.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "exit 3".to_string()],
            Duration::from_secs(5),
        );
        let err = generator.generate("prompt", "m").await.unwrap_err();
        assert!(matches!(err, GenerationError::Exit { code: Some(3) }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let generator =
            CommandGenerator::new("wikirag-no-such-program", Vec::new(), Duration::from_secs(5));
        let err = generator.generate("prompt", "m").await.unwrap_err();
        assert!(matches!(err, GenerationError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "sleep 5".to_string()],
            Duration::from_millis(200),
        );
        let err = generator.generate("prompt", "m").await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout { timeout_ms: 200 }));
    }
}
