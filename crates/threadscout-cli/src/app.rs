//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "threadscout")]
#[command(
    author,
    version,
    about = "Answer questions from community threads and LLM knowledge"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate search queries for a question
    Queries(QuestionArgs),

    /// Generate queries and gather evidence from every search provider
    Search(QuestionArgs),

    /// Run the full pipeline and print the final answer
    Answer(QuestionArgs),

    /// List available providers
    Providers,

    /// Check that configuration loads and providers can be built
    Health,
}

#[derive(Args, Debug, Default)]
pub struct QuestionArgs {
    /// Question title
    pub title: Vec<String>,

    /// Question body
    #[arg(long)]
    pub body: Option<String>,

    /// Where the question was asked (e.g. a forum name)
    #[arg(long)]
    pub source: Option<String>,

    /// URL of the original question
    #[arg(long)]
    pub url: Option<String>,

    /// Read the question as JSON from a file ("-" for stdin)
    #[arg(long, value_name = "FILE", conflicts_with = "title")]
    pub json: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
    Md,
}
