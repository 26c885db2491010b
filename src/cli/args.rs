//! Command-line argument parsing for wikirag
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::generation::Backend;

/// wikirag - answer questions with Wikipedia context and a local model
#[derive(Parser, Debug)]
#[command(name = "wikirag")]
#[command(version)]
#[command(
    about = "Answer questions with a local model grounded in Wikipedia articles",
    long_about = None
)]
pub struct Args {
    /// Model to generate with (overrides the config file)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Generation backend: ollama or command
    #[arg(long, global = true)]
    pub backend: Option<Backend>,

    /// MediaWiki api.php endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Number of articles to retrieve
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand; interactive mode when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Answer one question and exit
    Ask {
        /// Question words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Interactive question loop (default)
    Chat,

    /// Display the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Question text for single-shot mode
    pub fn question(&self) -> Option<String> {
        match &self.command {
            Some(Commands::Ask { question }) => Some(question.join(" ")),
            _ => None,
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "wikirag=warn",
            Verbosity::Verbose => "wikirag=info",
            Verbosity::VeryVerbose => "wikirag=debug",
        }
    }

    /// Check if should show stage progress
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show retrieved article details
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_interactive() {
        let args = Args::parse_from(["wikirag"]);
        assert!(args.command.is_none());
        assert!(args.question().is_none());
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_ask_joins_words() {
        let args = Args::parse_from(["wikirag", "ask", "What", "is", "quantum", "computing?"]);
        assert_eq!(args.question().as_deref(), Some("What is quantum computing?"));
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Args::try_parse_from(["wikirag", "ask"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["wikirag", "chat", "--model", "mistral", "-vv"]);
        assert_eq!(args.command, Some(Commands::Chat));
        assert_eq!(args.model.as_deref(), Some("mistral"));
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_backend_flag() {
        let args = Args::parse_from(["wikirag", "--backend", "command"]);
        assert_eq!(args.backend, Some(Backend::Command));
        assert!(Args::try_parse_from(["wikirag", "--backend", "nope"]).is_err());
    }

    #[test]
    fn test_quiet_wins() {
        let args = Args::parse_from(["wikirag", "-q", "-v"]);
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert!(!args.verbosity().show_progress());
    }
}
