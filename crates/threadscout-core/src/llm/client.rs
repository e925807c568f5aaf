//! HTTP client for external LLM services (Ollama, vLLM, OpenAI, etc.)

use crate::config::LLMServiceConfig;
use crate::error::{Result, ThreadScoutError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for LLM service clients
///
/// The pipeline treats the model as an opaque "complete this conversation"
/// capability; everything it knows about a backend goes through here.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &ChatOptions,
    ) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-call generation parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Overrides the client's configured model
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub seed: Option<u64>,
}

impl ChatOptions {
    /// Greedy decoding with a fixed seed, for reproducible judgments
    pub fn deterministic(seed: u64) -> Self {
        Self {
            model: None,
            temperature: Some(0.0),
            top_p: Some(1.0),
            seed: Some(seed),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// API metrics for monitoring
#[derive(Debug, Default)]
pub struct APIMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,
    pub total_latency_ms: AtomicU64,
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub avg_latency_ms: f64,
}

/// OpenAI-compatible chat client
///
/// Talks to `POST {url}/v1/chat/completions`, which Ollama, vLLM and
/// OpenAI all serve.
pub struct HttpLLMClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    metrics: Arc<APIMetrics>,
}

impl HttpLLMClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ThreadScoutError::Http)?;

        Ok(Self {
            http_client,
            config,
            metrics: Arc::new(APIMetrics::default()),
        })
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        let total = self.metrics.total_requests.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn record_error(&self) {
        self.metrics.total_errors.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &ChatOptions,
    ) -> Result<String> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let model = options.model.as_deref().unwrap_or(&self.config.model);
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            temperature: options.temperature,
            top_p: options.top_p,
            seed: options.seed,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.url.trim_end_matches('/')
        );
        tracing::debug!(model, %url, "Sending chat completion");

        let mut req = self.http_client.post(&url).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            self.record_error();
            if e.is_timeout() {
                ThreadScoutError::Timeout(format!("LLM request to {} timed out", url))
            } else {
                ThreadScoutError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            self.record_error();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ThreadScoutError::Retrieval(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            self.record_error();
            ThreadScoutError::Http(e)
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                self.record_error();
                ThreadScoutError::Llm("No response from LLM".to_string())
            })?
            .message
            .content;

        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics
            .total_latency_ms
            .fetch_add(elapsed, Ordering::Relaxed);

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_options() {
        let opts = ChatOptions::deterministic(42);
        assert_eq!(opts.temperature, Some(0.0));
        assert_eq!(opts.top_p, Some(1.0));
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.model, None);
    }

    #[test]
    fn test_request_omits_unset_options() {
        let request = ChatRequest {
            model: "llama3.1",
            messages: vec![ChatMessage::user("hi")],
            stream: false,
            temperature: None,
            top_p: None,
            seed: Some(7),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["seed"], 7);
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_metrics_start_empty() {
        let client = HttpLLMClient::new(LLMServiceConfig {
            url: "http://localhost:1".to_string(),
            model: "test".to_string(),
            api_key: None,
            timeout_secs: 1,
        })
        .unwrap();
        let snapshot = client.metrics();
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.avg_latency_ms, 0.0);
        assert_eq!(client.model_name(), "test");
    }

    #[tokio::test]
    async fn test_unreachable_service_errors() {
        let client = HttpLLMClient::new(LLMServiceConfig {
            url: "http://127.0.0.1:1".to_string(),
            model: "test".to_string(),
            api_key: None,
            timeout_secs: 2,
        })
        .unwrap();

        let result = client
            .chat_completion(vec![ChatMessage::user("hi")], &ChatOptions::default())
            .await;
        assert!(result.is_err());
        assert_eq!(client.metrics().total_errors, 1);
    }
}
