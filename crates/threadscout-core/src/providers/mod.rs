//! Search provider abstraction
//!
//! Provides a unified interface over heterogeneous evidence backends:
//! - LLM internal answer (the model's own knowledge)
//! - Meta-search restricted to a community site, reranked and enriched with
//!   thread comments
//!
//! Each provider implements the SearchProvider trait so fan-out can treat
//! every backend the same way. [`search_isolated`] is the failure boundary:
//! whatever happens inside a provider, the caller gets evidence items back.

use crate::community::{ArcticShiftClient, SearxngClient};
use crate::config::{Config, ProviderCatalog, ResolvedProvider};
use crate::error::{Result, ThreadScoutError};
use crate::llm::{
    HitReranker, HttpQueryGenerator, HttpSummarizer, LLMClient, QueryGenerator, Summarizer,
    TemplateStore,
};
use crate::models::{EvidenceItem, Question};
use std::sync::Arc;
use std::time::Duration;

pub mod llm_answer;
pub mod meta_search;

pub use llm_answer::LlmAnswerProvider;
pub use meta_search::MetaSearchProvider;

/// Search provider trait - all evidence backends must implement this
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier from the catalog (e.g., "searxng")
    fn provider_id(&self) -> &str;

    /// Human-readable name used in error items
    fn display_name(&self) -> &str;

    /// Gather evidence for a question using the primary keyword query
    async fn search(&self, question: &Question, keyword_query: &str)
        -> Result<Vec<EvidenceItem>>;
}

/// Evidence item standing in for a provider that failed
pub fn error_item(provider_id: &str, display_name: &str, error: &str) -> EvidenceItem {
    let summary = if error.trim().is_empty() {
        "Provider failed without an error message".to_string()
    } else {
        error.to_string()
    };

    EvidenceItem::new(provider_id, summary).with_title(Some(format!("{} search error", display_name)))
}

/// Run one provider with failure isolation
///
/// The provider runs on its own task. An error, a panic or exceeding
/// `timeout` all turn into a single [`error_item`]; this never fails.
pub async fn search_isolated(
    provider: Arc<dyn SearchProvider>,
    question: Arc<Question>,
    keyword_query: Arc<str>,
    timeout: Duration,
) -> Vec<EvidenceItem> {
    let provider_id = provider.provider_id().to_string();
    let display_name = provider.display_name().to_string();

    let handle = tokio::spawn(async move { provider.search(&question, &keyword_query).await });
    let abort = handle.abort_handle();

    let failure = match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(items))) => {
            tracing::debug!("Provider {} returned {} items", provider_id, items.len());
            return items;
        }
        Ok(Ok(Err(e))) => e.to_string(),
        Ok(Err(join_error)) => format!("provider task failed: {}", join_error),
        Err(_) => {
            abort.abort();
            ThreadScoutError::Timeout(format!(
                "provider {} exceeded {}s",
                provider_id,
                timeout.as_secs_f32()
            ))
            .to_string()
        }
    };

    tracing::warn!("Provider {} failed: {}", provider_id, failure);
    vec![error_item(&provider_id, &display_name, &failure)]
}

/// Provider instances resolved from configuration
///
/// Built once at startup; unknown provider ids fail here with a
/// configuration error rather than per request.
pub struct ProviderRegistry {
    pub query_generator: Arc<dyn QueryGenerator>,
    /// Search providers in fan-out order
    pub search_providers: Vec<Arc<dyn SearchProvider>>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl ProviderRegistry {
    /// Build every selected provider around a shared LLM client
    pub fn from_config(config: &Config, client: Arc<dyn LLMClient>) -> Result<Self> {
        let catalog = ProviderCatalog::builtin();
        let selection = catalog.resolve_selection(&config.providers)?;
        let templates = TemplateStore::from_config(config);

        let query_generator = build_query_generator(&selection.query, &client, &templates)?;
        let search_providers = selection
            .search
            .iter()
            .map(|p| build_search_provider(p, config, &client, &templates))
            .collect::<Result<Vec<_>>>()?;
        let summarizer = build_summarizer(&selection.summary, &client, &templates)?;

        tracing::info!(
            "Providers: query={}, search=[{}], summary={}",
            selection.query.id,
            selection
                .search
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            selection.summary.id
        );

        Ok(Self {
            query_generator,
            search_providers,
            summarizer,
        })
    }
}

fn build_query_generator(
    provider: &ResolvedProvider,
    client: &Arc<dyn LLMClient>,
    templates: &TemplateStore,
) -> Result<Arc<dyn QueryGenerator>> {
    match provider.id.as_str() {
        "ollama_query" => Ok(Arc::new(HttpQueryGenerator::new(
            Arc::clone(client),
            templates,
            provider.model.clone(),
        )?)),
        other => Err(unsupported("query", other)),
    }
}

fn build_search_provider(
    provider: &ResolvedProvider,
    config: &Config,
    client: &Arc<dyn LLMClient>,
    templates: &TemplateStore,
) -> Result<Arc<dyn SearchProvider>> {
    match provider.id.as_str() {
        "ollama_search" => Ok(Arc::new(LlmAnswerProvider::from_resolved(
            provider,
            Arc::clone(client),
            templates,
        )?)),
        "searxng" => {
            let reranker = HitReranker::new(Arc::clone(client), templates)?
                .with_top_k(config.rerank.top_k)
                .with_seed(config.rerank.seed)
                .with_model(config.providers.models.get(&provider.id).cloned());

            Ok(Arc::new(
                MetaSearchProvider::new(
                    Arc::new(SearxngClient::new(&config.searxng)?),
                    reranker,
                    Arc::new(ArcticShiftClient::new(&config.comments)?),
                )
                .with_identity(&provider.id, &provider.friendly_name)
                .with_comment_limits(config.comments.limit, config.comments.top_n),
            ))
        }
        other => Err(unsupported("search", other)),
    }
}

fn build_summarizer(
    provider: &ResolvedProvider,
    client: &Arc<dyn LLMClient>,
    templates: &TemplateStore,
) -> Result<Arc<dyn Summarizer>> {
    match provider.id.as_str() {
        "ollama_summary" => Ok(Arc::new(HttpSummarizer::new(
            Arc::clone(client),
            templates,
            provider.model.clone(),
        )?)),
        other => Err(unsupported("summary", other)),
    }
}

fn unsupported(section: &str, id: &str) -> ThreadScoutError {
    ThreadScoutError::Config(format!("Unknown {} provider: {}", section, id))
}
