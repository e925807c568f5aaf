//! Configuration management

pub mod catalog;

pub use catalog::{
    ProviderCatalog, ProviderInfo, ProviderModel, ProviderSection, ProviderSelection,
    ResolvedProvider, ResolvedSelection, SectionName,
};

use crate::error::{Result, ThreadScoutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Built once at process start and passed by reference into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM service used for query generation, answering, reranking and summaries
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Meta-search engine configuration
    #[serde(default)]
    pub searxng: SearxngConfig,

    /// Comment source used to enrich community threads
    #[serde(default)]
    pub comments: CommentSourceConfig,

    #[serde(default)]
    pub rerank: RerankConfig,

    /// Selected providers per pipeline section
    #[serde(default)]
    pub providers: ProviderSelection,

    /// Upper bound for a single search provider call during fan-out
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,

    /// Directory with prompt templates overriding the built-in ones
    #[serde(default = "default_templates_dir")]
    pub templates_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_service: LLMServiceConfig::default(),
            searxng: SearxngConfig::default(),
            comments: CommentSourceConfig::default(),
            rerank: RerankConfig::default(),
            providers: ProviderSelection::default(),
            provider_timeout_secs: default_provider_timeout(),
            templates_dir: default_templates_dir(),
        }
    }
}

/// LLM service configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the LLM service
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Default model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_chat_model(),
            api_key: std::env::var("THREADSCOUT_LLM_API_KEY").ok(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("THREADSCOUT_LLM_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

fn default_chat_model() -> String {
    std::env::var("THREADSCOUT_LLM_MODEL").unwrap_or_else(|_| "llama3.1".to_string())
}

fn default_llm_timeout() -> u64 {
    120
}

/// SearXNG meta-search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearxngConfig {
    #[serde(default = "default_searxng_url")]
    pub url: String,

    /// SearXNG engine the search is restricted to
    #[serde(default = "default_searxng_engine")]
    pub engine: String,

    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearxngConfig {
    fn default() -> Self {
        Self {
            url: default_searxng_url(),
            engine: default_searxng_engine(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_searxng_url() -> String {
    std::env::var("THREADSCOUT_SEARXNG_URL").unwrap_or_else(|_| "http://localhost:8888".to_string())
}

fn default_searxng_engine() -> String {
    "reddit".to_string()
}

/// Arctic Shift comment archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSourceConfig {
    #[serde(default = "default_comments_url")]
    pub url: String,

    /// Comments requested per thread
    #[serde(default = "default_comment_limit")]
    pub limit: usize,

    /// Comments rendered into the evidence block
    #[serde(default = "default_comment_top_n")]
    pub top_n: usize,

    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for CommentSourceConfig {
    fn default() -> Self {
        Self {
            url: default_comments_url(),
            limit: default_comment_limit(),
            top_n: default_comment_top_n(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_comments_url() -> String {
    std::env::var("THREADSCOUT_ARCTIC_SHIFT_URL")
        .unwrap_or_else(|_| "https://arctic-shift.photon-reddit.com/api".to_string())
}

fn default_comment_limit() -> usize {
    10
}

fn default_comment_top_n() -> usize {
    5
}

fn default_http_timeout() -> u64 {
    15
}

/// Reranking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    /// Number of hits kept after reranking
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Sampling seed for reproducible reranking
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            seed: default_seed(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

fn default_seed() -> u64 {
    42
}

fn default_provider_timeout() -> u64 {
    std::env::var("THREADSCOUT_PROVIDER_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20)
}

fn default_templates_dir() -> Option<PathBuf> {
    std::env::var("THREADSCOUT_TEMPLATES_DIR")
        .ok()
        .map(PathBuf::from)
}

impl Config {
    /// Load config from `$THREADSCOUT_CONFIG` or the default path
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("THREADSCOUT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load config from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject values that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        if self.rerank.top_k == 0 {
            return Err(ThreadScoutError::Config(
                "rerank.top_k must be at least 1".to_string(),
            ));
        }
        if self.provider_timeout_secs == 0 {
            return Err(ThreadScoutError::Config(
                "provider_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm_service.timeout_secs == 0
            || self.searxng.timeout_secs == 0
            || self.comments.timeout_secs == 0
        {
            return Err(ThreadScoutError::Config(
                "HTTP timeouts must be greater than 0".to_string(),
            ));
        }
        if self.providers.search.is_empty() {
            return Err(ThreadScoutError::Config(
                "at least one search provider must be selected".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rerank.top_k, 3);
        assert_eq!(config.rerank.seed, 42);
        assert_eq!(config.comments.limit, 10);
        assert_eq!(config.comments.top_n, 5);
        assert_eq!(config.searxng.engine, "reddit");
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rerank:\n  top_k: 5\nproviders:\n  search: [searxng]\nprovider_timeout_secs: 7"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.rerank.top_k, 5);
        assert_eq!(config.rerank.seed, 42);
        assert_eq!(config.providers.search, vec!["searxng".to_string()]);
        assert_eq!(config.providers.query, "ollama_query");
        assert_eq!(config.provider_timeout_secs, 7);
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        config.rerank.top_k = 0;
        assert!(matches!(
            config.validate(),
            Err(ThreadScoutError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_search_selection() {
        let mut config = Config::default();
        config.providers.search.clear();
        assert!(config.validate().is_err());
    }
}
