//! Question answering pipeline
//!
//! GenerateQueries → FanOutSearch → Summarize. Each stage owns its output
//! until it is moved into the next one.

use crate::config::Config;
use crate::error::{Result, ThreadScoutError};
use crate::llm::{LLMClient, QueryGenerator, Summarizer};
use crate::models::{EvidenceItem, FinalAnswer, QuerySet, Question};
use crate::providers::ProviderRegistry;
use crate::search::FanOut;
use std::sync::Arc;
use std::time::Duration;

pub const STAGE_QUERIES: &str = "generate_queries";
pub const STAGE_SUMMARY: &str = "summarize";

/// Queries plus the evidence gathered for them
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchOutcome {
    pub queries: QuerySet,
    pub evidence: Vec<EvidenceItem>,
}

pub struct Pipeline {
    query_generator: Arc<dyn QueryGenerator>,
    fan_out: FanOut,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        query_generator: Arc<dyn QueryGenerator>,
        fan_out: FanOut,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            query_generator,
            fan_out,
            summarizer,
        }
    }

    pub fn from_registry(registry: ProviderRegistry, provider_timeout: Duration) -> Self {
        let fan_out = FanOut::new(registry.search_providers).with_timeout(provider_timeout);
        Self::new(registry.query_generator, fan_out, registry.summarizer)
    }

    /// Build every configured provider around `client`
    pub fn from_config(config: &Config, client: Arc<dyn LLMClient>) -> Result<Self> {
        config.validate()?;
        let registry = ProviderRegistry::from_config(config, client)?;
        Ok(Self::from_registry(
            registry,
            Duration::from_secs(config.provider_timeout_secs),
        ))
    }

    pub fn fan_out(&self) -> &FanOut {
        &self.fan_out
    }

    /// Stage 1: derive search queries from the question
    pub async fn generate_queries(&self, question: &Question) -> Result<QuerySet> {
        validate_question(question)?;

        let queries = self
            .query_generator
            .generate(question)
            .await
            .map_err(|e| ThreadScoutError::in_stage(STAGE_QUERIES, e))?;

        tracing::info!("Keyword query: {:?}", queries.keyword_query);
        Ok(queries)
    }

    /// Stage 2: fan out to every search provider; never fails
    pub async fn search(&self, question: &Question, queries: &QuerySet) -> Vec<EvidenceItem> {
        self.fan_out
            .search_across_providers(question, &queries.keyword_query)
            .await
    }

    /// Stages 1 and 2
    pub async fn generate_search(&self, question: &Question) -> Result<SearchOutcome> {
        let queries = self.generate_queries(question).await?;
        let evidence = self.search(question, &queries).await;
        Ok(SearchOutcome { queries, evidence })
    }

    /// Stage 3: synthesize the final answer
    pub async fn summarize(
        &self,
        question: &Question,
        queries: &QuerySet,
        evidence: Vec<EvidenceItem>,
    ) -> Result<FinalAnswer> {
        self.summarizer
            .summarize(question, queries, evidence)
            .await
            .map_err(|e| ThreadScoutError::in_stage(STAGE_SUMMARY, e))
    }

    /// Run all three stages
    pub async fn run(&self, question: &Question) -> Result<FinalAnswer> {
        let SearchOutcome { queries, evidence } = self.generate_search(question).await?;
        tracing::info!("Summarizing {} evidence items", evidence.len());
        self.summarize(question, &queries, evidence).await
    }
}

fn validate_question(question: &Question) -> Result<()> {
    if question.title.trim().is_empty() {
        return Err(ThreadScoutError::InvalidInput(
            "question title must not be empty".to_string(),
        ));
    }
    Ok(())
}
