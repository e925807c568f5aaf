//! Error types for threadscout

use thiserror::Error;

/// Result type alias using ThreadScoutError
pub type Result<T> = std::result::Result<T, ThreadScoutError>;

/// Error type alias for convenience
pub type Error = ThreadScoutError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for threadscout
#[derive(Debug, Error)]
pub enum ThreadScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model response was not valid JSON or not the expected shape
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    /// Network or backend failure (meta-search, comment source, LLM transport)
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A pipeline stage failed and nothing downstream could recover it
    #[error("Pipeline stage '{stage}' failed: {source}")]
    Pipeline {
        stage: &'static str,
        #[source]
        source: Box<ThreadScoutError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ThreadScoutError {
    /// Wrap an error as the failure of a named pipeline stage
    pub fn in_stage(stage: &'static str, source: ThreadScoutError) -> Self {
        Self::Pipeline {
            stage,
            source: Box::new(source),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Yaml(_) | Self::InvalidInput(_) | Self::Template(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::Pipeline { source, .. } => source.exit_code(),
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
