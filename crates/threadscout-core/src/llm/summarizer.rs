//! Final answer synthesis from aggregated evidence

use super::templates::{render, TemplateStore, SUMMARY_TEMPLATE};
use super::{ChatMessage, ChatOptions, LLMClient};
use crate::error::{Result, ThreadScoutError};
use crate::models::{EvidenceItem, FinalAnswer, QuerySet, Question};
use async_trait::async_trait;
use std::sync::Arc;

/// Evidence text used when no provider returned anything
pub const NO_EVIDENCE_NOTICE: &str = "No detailed results were available to summarize.";

/// Summarization trait
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a final answer; `evidence` is passed through unchanged
    async fn summarize(
        &self,
        question: &Question,
        queries: &QuerySet,
        evidence: Vec<EvidenceItem>,
    ) -> Result<FinalAnswer>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Summarizer backed by an LLM service
pub struct HttpSummarizer {
    client: Arc<dyn LLMClient>,
    template: String,
    model: Option<String>,
}

impl HttpSummarizer {
    pub fn new(
        client: Arc<dyn LLMClient>,
        templates: &TemplateStore,
        model: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            template: templates.load(SUMMARY_TEMPLATE)?,
            model,
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(
        &self,
        question: &Question,
        queries: &QuerySet,
        evidence: Vec<EvidenceItem>,
    ) -> Result<FinalAnswer> {
        let generated_queries = serde_json::to_string_pretty(queries)?;
        let combined_evidence = combine_evidence(&evidence);

        let prompt = render(
            &self.template,
            &[
                ("question_title", question.title.as_str()),
                ("question_body", question.body_text()),
                ("generated_queries", generated_queries.as_str()),
                ("combined_evidence", combined_evidence.as_str()),
            ],
        );

        let options = ChatOptions::default().with_model(self.model.clone());
        let response = self
            .client
            .chat_completion(vec![ChatMessage::user(prompt)], &options)
            .await?;

        let final_summary = response.trim();
        if final_summary.is_empty() {
            return Err(ThreadScoutError::MalformedOutput(
                "summarizer returned an empty answer".to_string(),
            ));
        }

        tracing::info!(
            "Summarized {} evidence items into {} chars",
            evidence.len(),
            final_summary.len()
        );

        Ok(FinalAnswer {
            final_summary: final_summary.to_string(),
            per_source_results: evidence,
        })
    }

    fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.client.model_name())
    }
}

/// One `[source] header: summary` line per evidence item
///
/// The header is `title (url)` when either is known, else the source tag.
pub fn combine_evidence(evidence: &[EvidenceItem]) -> String {
    let combined = evidence
        .iter()
        .map(|item| {
            let header_parts: Vec<String> = [
                item.title.clone(),
                item.url.as_ref().map(|u| format!("({})", u)),
            ]
            .into_iter()
            .flatten()
            .collect();

            let header = if header_parts.is_empty() {
                item.source.clone()
            } else {
                header_parts.join(" ")
            };

            format!("[{}] {}: {}", item.source, header, item.summary)
        })
        .collect::<Vec<_>>()
        .join("\n");

    if combined.trim().is_empty() {
        NO_EVIDENCE_NOTICE.to_string()
    } else {
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_evidence_headers() {
        let evidence = vec![
            EvidenceItem::new("llm:ollama", "Restart it.")
                .with_title(Some("LLM internal answer".into())),
            EvidenceItem::new("searxng:reddit", "Same here")
                .with_title(Some("X broke".into()))
                .with_url(Some("https://reddit.com/r/x/comments/abc/".into())),
            EvidenceItem::new("searxng", "connection refused"),
        ];

        let text = combine_evidence(&evidence);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[llm:ollama] LLM internal answer: Restart it.");
        assert_eq!(
            lines[1],
            "[searxng:reddit] X broke (https://reddit.com/r/x/comments/abc/): Same here"
        );
        assert_eq!(lines[2], "[searxng] searxng: connection refused");
    }

    #[test]
    fn test_combine_empty_evidence() {
        assert_eq!(combine_evidence(&[]), NO_EVIDENCE_NOTICE);
    }
}
