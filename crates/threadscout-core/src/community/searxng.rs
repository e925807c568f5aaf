//! SearXNG meta-search client restricted to one engine

use crate::config::SearxngConfig;
use crate::error::{Result, ThreadScoutError};
use crate::models::RawSearchHit;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Meta-search capability: query in, raw hits out
#[async_trait]
pub trait MetaSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>>;

    /// Engine or site the search is restricted to
    fn target(&self) -> &str;
}

/// Client for a self-hosted SearXNG instance (JSON output must be enabled)
pub struct SearxngClient {
    client: Client,
    base_url: String,
    engine: String,
}

impl SearxngClient {
    pub fn new(config: &SearxngConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("threadscout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            engine: config.engine.clone(),
        })
    }
}

#[async_trait]
impl MetaSearch for SearxngClient {
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("engines", self.engine.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ThreadScoutError::Retrieval(format!("SearXNG request timed out: {}", url))
                } else if e.is_connect() {
                    ThreadScoutError::Retrieval(format!("Cannot reach SearXNG at {}", url))
                } else {
                    ThreadScoutError::Retrieval(format!("SearXNG request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match status {
                StatusCode::FORBIDDEN => {
                    "SearXNG refused the request (403): is the json format enabled in settings.yml?"
                        .to_string()
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    "SearXNG rate limit exceeded (429)".to_string()
                }
                s => format!("SearXNG returned HTTP {}", s.as_u16()),
            };
            return Err(ThreadScoutError::Retrieval(message));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ThreadScoutError::Retrieval(format!("Invalid SearXNG payload: {}", e)))?;

        let hits = parse_search_payload(payload);
        tracing::debug!("SearXNG returned {} results for {:?}", hits.len(), query);
        Ok(hits)
    }

    fn target(&self) -> &str {
        &self.engine
    }
}

/// Decode the `results` list; a missing or non-list field is empty
pub fn parse_search_payload(payload: Value) -> Vec<RawSearchHit> {
    match payload {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_results() {
        let payload = json!({
            "query": "fix x",
            "results": [
                {"title": "X broke", "url": "https://www.reddit.com/r/x/comments/a1/x_broke/", "content": "help", "engine": "reddit", "score": 1.0},
                {"title": "No url"},
                42
            ]
        });

        let hits = parse_search_payload(payload);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title.as_deref(), Some("X broke"));
        assert_eq!(hits[0].content.as_deref(), Some("help"));
        assert_eq!(hits[1].url, None);
    }

    #[test]
    fn test_parse_non_list_results() {
        assert!(parse_search_payload(json!({"results": {"a": 1}})).is_empty());
        assert!(parse_search_payload(json!({})).is_empty());
        assert!(parse_search_payload(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_target_engine() {
        let client = SearxngClient::new(&SearxngConfig {
            url: "http://localhost:8888/".to_string(),
            engine: "reddit".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.target(), "reddit");
        assert_eq!(client.base_url, "http://localhost:8888");
    }

    #[tokio::test]
    async fn test_unreachable_instance() {
        let client = SearxngClient::new(&SearxngConfig {
            url: "http://127.0.0.1:1".to_string(),
            engine: "reddit".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let result = client.search("fix x").await;
        assert!(matches!(result, Err(ThreadScoutError::Retrieval(_))));
    }
}
