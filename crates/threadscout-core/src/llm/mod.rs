//! LLM integration
//!
//! Provides traits and implementations for:
//! - Chat completion via external services (Ollama, vLLM, OpenAI, etc.)
//! - Query generation
//! - Reranking of meta-search hits
//! - Answer summarization

mod client;
mod query_generator;
mod reranker;
mod response;
mod summarizer;
pub mod templates;

pub use client::{
    APIMetrics, ChatMessage, ChatOptions, HttpLLMClient, LLMClient, MetricsSnapshot,
};
pub use query_generator::{parse_query_response, HttpQueryGenerator, QueryGenerator};
pub use reranker::{
    decode_selection, FallbackReason, HitReranker, Selection, DEFAULT_SEED, DEFAULT_TOP_K,
};
pub use response::strip_code_fences;
pub use summarizer::{combine_evidence, HttpSummarizer, Summarizer, NO_EVIDENCE_NOTICE};
pub use templates::TemplateStore;
