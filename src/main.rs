//! wikirag - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use wikirag::{
    cli::{Args, Commands, Config},
    execution::execute_question,
    generation::{build_generator, Backend, Generator, OllamaGenerator},
    rag::RagPipeline,
    repl::{DisplayManager, ReplSession},
    telemetry,
    wiki::Wikipedia,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    telemetry::init_tracing(verbosity);

    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_args(&args);
    config.validate()?;

    if let Some(Commands::Config { init }) = &args.command {
        return show_config(&config, &args, *init);
    }

    let source = Arc::new(
        Wikipedia::new(config.wikipedia.clone()).context("Failed to build Wikipedia client")?,
    );
    let generator: Arc<dyn Generator> = Arc::from(build_generator(&config.generation)?);
    let pipeline = RagPipeline::new(
        source,
        generator.clone(),
        config.generation.model.clone(),
        config.retrieval.clone(),
    );

    if let Some(question) = args.question() {
        return Ok(match execute_question(&pipeline, &question, verbosity).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::from(1),
        });
    }

    let display = DisplayManager::new(verbosity);
    if verbosity.show_progress() {
        display.show_banner(
            env!("CARGO_PKG_VERSION"),
            &config.generation.model,
            &generator.describe(),
        );
    }

    if config.generation.backend == Backend::Ollama {
        let probe = OllamaGenerator::new(&config.generation.ollama_url(), Duration::from_secs(5))?;
        if !probe.health_check().await {
            display.show_warning(&format!(
                "Ollama is not reachable at {} (start it with: ollama serve)",
                probe.base_url()
            ));
        }
    }

    let mut session = ReplSession::new(verbosity)?;
    let stats = session.run(&pipeline).await?;
    tracing::info!(answered = stats.answered, failed = stats.failed, "session finished");

    Ok(ExitCode::SUCCESS)
}

/// `wikirag config [--init]`
fn show_config(config: &Config, args: &Args, init: bool) -> Result<ExitCode> {
    let display = DisplayManager::new(args.verbosity());

    if init {
        let path = match args.config.clone().or_else(Config::default_path) {
            Some(path) => path,
            None => anyhow::bail!("Could not determine home directory"),
        };

        if path.exists() {
            display.show_info(&format!("Config already exists at {}", path.display()));
        } else {
            Config::default().save(&path)?;
            display.show_info(&format!("Wrote default config to {}", path.display()));
        }
    }

    println!("{}", config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}
