//! ThreadScout Core Library
//!
//! Answers a natural-language question by generating search queries, fanning
//! them out to several evidence providers and summarizing what comes back.
//!
//! # Features
//! - LLM query generation with fallback on malformed output
//! - Concurrent provider fan-out with per-provider failure isolation
//! - SearXNG community search with LLM reranking
//! - Thread enrichment with top comments from Arctic Shift
//! - Answer synthesis with per-source attribution

pub mod community;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod search;

pub use config::{Config, LLMServiceConfig, ProviderCatalog, ProviderSelection};
pub use error::{Error, Result, ThreadScoutError};
pub use llm::{
    ChatMessage, ChatOptions, HitReranker, HttpLLMClient, HttpQueryGenerator, HttpSummarizer,
    LLMClient, MetricsSnapshot, QueryGenerator, Summarizer, TemplateStore,
};
pub use models::{EvidenceItem, FinalAnswer, QuerySet, Question, RawSearchHit};
pub use pipeline::{Pipeline, SearchOutcome};
pub use providers::{
    search_isolated, LlmAnswerProvider, MetaSearchProvider, ProviderRegistry, SearchProvider,
};
pub use search::FanOut;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "threadscout";
