//! Concurrent fan-out across search providers

use crate::models::{EvidenceItem, Question};
use crate::providers::{search_isolated, SearchProvider};
use std::sync::Arc;
use std::time::Duration;

/// Per-provider deadline unless configured otherwise
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(20);

/// Runs every configured provider for one request and merges the evidence
#[derive(Clone)]
pub struct FanOut {
    providers: Vec<Arc<dyn SearchProvider>>,
    timeout: Duration,
}

impl FanOut {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_id()).collect()
    }

    /// Query all providers concurrently
    ///
    /// Output is grouped by provider in configured order, each group keeping
    /// the provider's own order. A failing provider contributes one error
    /// item instead of failing the request.
    pub async fn search_across_providers(
        &self,
        question: &Question,
        keyword_query: &str,
    ) -> Vec<EvidenceItem> {
        let question = Arc::new(question.clone());
        let keyword_query: Arc<str> = Arc::from(keyword_query);

        let tasks: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                search_isolated(
                    Arc::clone(provider),
                    Arc::clone(&question),
                    Arc::clone(&keyword_query),
                    self.timeout,
                )
            })
            .collect();

        let outcomes = futures::future::join_all(tasks).await;

        let mut evidence = Vec::new();
        for (provider, items) in self.providers.iter().zip(outcomes) {
            tracing::debug!(
                provider = provider.provider_id(),
                count = items.len(),
                "provider finished"
            );
            evidence.extend(items);
        }

        tracing::info!(
            "Fan-out over {} providers produced {} evidence items",
            self.providers.len(),
            evidence.len()
        );
        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ThreadScoutError};
    use async_trait::async_trait;

    struct Static {
        id: &'static str,
        delay: Duration,
        items: Vec<&'static str>,
    }

    #[async_trait]
    impl SearchProvider for Static {
        fn provider_id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            self.id
        }

        async fn search(&self, _q: &Question, _k: &str) -> Result<Vec<EvidenceItem>> {
            tokio::time::sleep(self.delay).await;
            Ok(self
                .items
                .iter()
                .map(|s| EvidenceItem::new(self.id, *s))
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl SearchProvider for Failing {
        fn provider_id(&self) -> &str {
            "searxng"
        }

        fn display_name(&self) -> &str {
            "SearXNG"
        }

        async fn search(&self, _q: &Question, _k: &str) -> Result<Vec<EvidenceItem>> {
            Err(ThreadScoutError::Retrieval("Cannot reach SearXNG".into()))
        }
    }

    fn provider(
        id: &'static str,
        delay_ms: u64,
        items: Vec<&'static str>,
    ) -> Arc<dyn SearchProvider> {
        Arc::new(Static {
            id,
            delay: Duration::from_millis(delay_ms),
            items,
        })
    }

    #[tokio::test]
    async fn test_configured_order_not_completion_order() {
        let fan_out = FanOut::new(vec![
            provider("slow", 50, vec!["s1", "s2"]),
            provider("fast", 0, vec!["f1"]),
        ]);

        let items = fan_out
            .search_across_providers(&Question::new("q"), "q")
            .await;
        let summaries: Vec<_> = items.iter().map(|i| i.summary.as_str()).collect();
        assert_eq!(summaries, vec!["s1", "s2", "f1"]);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let fan_out = FanOut::new(vec![
            Arc::new(Failing) as Arc<dyn SearchProvider>,
            provider("llm", 0, vec!["answer"]),
        ]);

        let items = fan_out
            .search_across_providers(&Question::new("q"), "q")
            .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "searxng");
        assert_eq!(items[0].title.as_deref(), Some("SearXNG search error"));
        assert_eq!(items[1].summary, "answer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_error_item() {
        let fan_out = FanOut::new(vec![
            provider("stuck", 60_000, vec!["never"]),
            provider("quick", 0, vec!["ok"]),
        ])
        .with_timeout(Duration::from_secs(1));

        let items = fan_out
            .search_across_providers(&Question::new("q"), "q")
            .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "stuck");
        assert!(items[0].summary.contains("exceeded"));
        assert_eq!(items[1].summary, "ok");
    }

    #[tokio::test]
    async fn test_no_providers() {
        let fan_out = FanOut::new(vec![]);
        assert!(fan_out
            .search_across_providers(&Question::new("q"), "q")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_repeatable_with_deterministic_providers() {
        let fan_out = FanOut::new(vec![
            provider("a", 5, vec!["a1"]),
            provider("b", 0, vec!["b1", "b2"]),
        ]);
        let question = Question::new("q");

        let first = fan_out.search_across_providers(&question, "q").await;
        let second = fan_out.search_across_providers(&question, "q").await;
        assert_eq!(first, second);
        assert_eq!(fan_out.provider_ids(), vec!["a", "b"]);
    }
}
