//! Console output for progress events, answers and errors

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::Verbosity;
use crate::rag::{PipelineEvent, RagAnswer};

/// Display manager for pipeline progress and results
///
/// Progress lines go to stdout alongside the answer; diagnostics go through
/// `tracing` on stderr.
pub struct DisplayManager {
    verbosity: Verbosity,
    spinner: Option<ProgressBar>,
}

impl DisplayManager {
    pub fn new(verbosity: Verbosity) -> Self {
        DisplayManager {
            verbosity,
            spinner: None,
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, backend: &str) {
        let width = 64;
        let rule = "=".repeat(width);

        println!("{}", rule.cyan());
        println!("{}", format!("  wikirag {} - Wikipedia + local LLM", version).bold().cyan());
        println!("{}", format!("  Model: {} | Backend: {}", model, backend).dimmed());
        println!("{}", rule.cyan());
        println!("\nType your questions (or {} to quit)", "exit".green());
        println!("Example: What is quantum computing?");
    }

    /// Render one pipeline event
    pub fn show_event(&mut self, event: &PipelineEvent) {
        if !self.verbosity.show_progress() {
            return;
        }

        match event {
            PipelineEvent::Generating { streams: false, .. } => {
                if let Some(line) = event_line(event, self.verbosity) {
                    self.start_spinner(line);
                }
            }
            PipelineEvent::Completed { .. } | PipelineEvent::Failed { .. } => {
                self.finish_spinner();
                if let Some(line) = event_line(event, self.verbosity) {
                    println!("{}", line.dimmed());
                }
            }
            PipelineEvent::RetrievalFailed { .. } => {
                if let Some(line) = event_line(event, self.verbosity) {
                    println!("{}", line.yellow());
                }
            }
            _ => {
                if let Some(line) = event_line(event, self.verbosity) {
                    println!("{}", line);
                }
            }
        }
    }

    /// Display the answer of a finished run
    pub fn show_answer(&mut self, result: &RagAnswer) {
        self.finish_spinner();

        if !self.verbosity.show_progress() {
            if !result.answer.streamed {
                println!("{}", result.answer.trimmed());
            }
            return;
        }

        if result.answer.streamed {
            println!();
        } else {
            println!("\n{}", "📝 Answer:".bold().green());
            let text = result.answer.trimmed();
            if text.is_empty() {
                println!("{}", "(the model returned an empty answer)".dimmed());
            } else {
                println!("{}", text);
            }
        }

        if self.verbosity.show_details() && !result.context.titles.is_empty() {
            println!(
                "\n{} {}",
                "Sources:".dimmed(),
                result.context.titles.join(", ").dimmed()
            );
        }
    }

    /// Display error message
    pub fn show_error(&mut self, error: &str) {
        self.finish_spinner();
        eprintln!("\n{} {}", "❌ Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    fn start_spinner(&mut self, message: String) {
        self.finish_spinner();

        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            pb.set_style(style);
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn finish_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

/// Plain-text progress line for an event, if it is shown at this verbosity
pub fn event_line(event: &PipelineEvent, verbosity: Verbosity) -> Option<String> {
    let line = match event {
        PipelineEvent::Searching { .. } => "\n🔍 Searching Wikipedia...".to_string(),
        PipelineEvent::TitlesFound { titles } => {
            format!("📚 Found {} relevant articles", titles.len())
        }
        PipelineEvent::NoResultsFallback => {
            "📭 No Wikipedia results, asking the model without context".to_string()
        }
        PipelineEvent::Retrieving { title } => format!("📖 Retrieving: {}", title),
        PipelineEvent::RetrievalFailed { title, error } => {
            format!("⚠️  Error retrieving {}: {}", title, error)
        }
        PipelineEvent::ContextAssembled { articles, truncated } => {
            if !verbosity.show_details() {
                return None;
            }
            format!("🧩 Context: {} articles ({} truncated)", articles, truncated)
        }
        PipelineEvent::Generating { backend, .. } => {
            format!("\n🤖 Generating answer with {}...", backend)
        }
        PipelineEvent::Completed { duration_ms } => {
            if !verbosity.show_details() {
                return None;
            }
            format!("✓ Done in {}", format_duration(*duration_ms))
        }
        PipelineEvent::Failed { stage, .. } => {
            if !verbosity.show_details() {
                return None;
            }
            format!("✗ Stopped during {}", stage)
        }
    };

    Some(line)
}

fn format_duration(duration_ms: u64) -> String {
    if duration_ms >= 1000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_lines() {
        let line = event_line(
            &PipelineEvent::TitlesFound {
                titles: vec!["A".to_string(), "B".to_string()],
            },
            Verbosity::Normal,
        )
        .unwrap();
        assert_eq!(line, "📚 Found 2 relevant articles");

        let line = event_line(
            &PipelineEvent::RetrievalFailed {
                title: "Gone".to_string(),
                error: "no content found for 'Gone'".to_string(),
            },
            Verbosity::Normal,
        )
        .unwrap();
        assert!(line.contains("Gone"));
        assert!(line.contains("no content found"));
    }

    #[test]
    fn test_detail_lines_need_verbose() {
        let event = PipelineEvent::ContextAssembled {
            articles: 2,
            truncated: 1,
        };
        assert!(event_line(&event, Verbosity::Normal).is_none());
        assert!(event_line(&event, Verbosity::Verbose)
            .unwrap()
            .contains("1 truncated"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(2500), "2.5s");
    }

    #[test]
    fn test_quiet_display_ignores_events() {
        let mut display = DisplayManager::new(Verbosity::Quiet);
        display.show_event(&PipelineEvent::Generating {
            backend: "Ollama".to_string(),
            streams: false,
        });
        assert!(display.spinner.is_none());
    }
}
