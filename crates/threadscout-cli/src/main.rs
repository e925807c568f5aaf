//! ThreadScout CLI
//!
//! Answer a question from community threads and LLM knowledge.

use anyhow::Result;
use clap::Parser;
use threadscout_core::error::exit_codes;
use threadscout_core::{Config, ThreadScoutError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Queries(args) => commands::queries::run(args, &config, cli.format).await,
        Commands::Search(args) => commands::search::run(args, &config, cli.format).await,
        Commands::Answer(args) => commands::answer::run(args, &config, cli.format).await,
        Commands::Providers => commands::providers::run(&config, cli.format),
        Commands::Health => commands::health::run(&config, cli.format),
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ThreadScoutError>()
        .map(ThreadScoutError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
