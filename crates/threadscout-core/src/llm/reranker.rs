//! LLM reranking of raw search hits
//!
//! The model is asked for a JSON array of 1-based candidate numbers. Its
//! answer is untrusted: [`decode_selection`] turns it into either a ranked
//! list of positions or an explicit fallback, and the fallback always keeps
//! the first `top_k` hits in their original order.

use super::response::strip_code_fences;
use super::templates::{render, TemplateStore, RERANK_TEMPLATE};
use super::{ChatMessage, ChatOptions, LLMClient};
use crate::error::Result;
use crate::models::{Question, RawSearchHit};
use serde_json::Value;
use std::sync::Arc;

/// Hits kept after reranking unless configured otherwise
pub const DEFAULT_TOP_K: usize = 3;

/// Seed used for reproducible rerank calls unless configured otherwise
pub const DEFAULT_SEED: u64 = 42;

/// Why the model's answer was not used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NotJson,
    NotAList,
    NothingSelected,
}

/// Decoded reranker answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 0-based positions into the hit list, in the model's order
    Ranked(Vec<usize>),
    Fallback(FallbackReason),
}

impl Selection {
    /// Pick hits according to this selection
    pub fn apply(self, hits: Vec<RawSearchHit>, top_k: usize) -> Vec<RawSearchHit> {
        match self {
            Selection::Ranked(positions) => positions
                .into_iter()
                .filter_map(|pos| hits.get(pos).cloned())
                .take(top_k)
                .collect(),
            Selection::Fallback(_) => hits.into_iter().take(top_k).collect(),
        }
    }
}

/// Validate and normalize the model's answer
///
/// Non-integer and out-of-range indices are skipped; collection stops once
/// `top_k` positions are chosen.
pub fn decode_selection(response: &str, hit_count: usize, top_k: usize) -> Selection {
    let parsed: Value = match serde_json::from_str(strip_code_fences(response)) {
        Ok(json) => json,
        Err(_) => return Selection::Fallback(FallbackReason::NotJson),
    };

    let Value::Array(indices) = parsed else {
        return Selection::Fallback(FallbackReason::NotAList);
    };

    let positions: Vec<usize> = indices
        .iter()
        .filter_map(Value::as_u64)
        .filter(|&idx| idx >= 1 && idx <= hit_count as u64)
        .map(|idx| (idx - 1) as usize)
        .take(top_k)
        .collect();

    if positions.is_empty() {
        Selection::Fallback(FallbackReason::NothingSelected)
    } else {
        Selection::Ranked(positions)
    }
}

/// Reranks meta-search hits with an LLM judgment
pub struct HitReranker {
    client: Arc<dyn LLMClient>,
    template: String,
    top_k: usize,
    seed: u64,
    model: Option<String>,
}

impl HitReranker {
    pub fn new(client: Arc<dyn LLMClient>, templates: &TemplateStore) -> Result<Self> {
        Ok(Self {
            client,
            template: templates.load(RERANK_TEMPLATE)?,
            top_k: DEFAULT_TOP_K,
            seed: DEFAULT_SEED,
            model: None,
        })
    }

    /// Number of hits to keep; zero is treated as one
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Select the `top_k` hits most relevant to the question
    ///
    /// Never returns an empty list for non-empty input. Only a failed model
    /// call is an error.
    pub async fn rerank(
        &self,
        question: &Question,
        raw_hits: Vec<RawSearchHit>,
    ) -> Result<Vec<RawSearchHit>> {
        if raw_hits.is_empty() {
            return Ok(vec![]);
        }

        let prompt = build_rerank_prompt(&self.template, question, &raw_hits, self.top_k);
        let options = ChatOptions::deterministic(self.seed).with_model(self.model.clone());

        let response = self
            .client
            .chat_completion(vec![ChatMessage::user(prompt)], &options)
            .await?;

        let selection = decode_selection(&response, raw_hits.len(), self.top_k);
        match &selection {
            Selection::Ranked(positions) => {
                tracing::debug!("Reranker selected positions {:?}", positions);
            }
            Selection::Fallback(reason) => {
                tracing::warn!(
                    "Reranker output unusable ({:?}), keeping first {} hits",
                    reason,
                    self.top_k
                );
                tracing::debug!("Raw LLM response: {}", response);
            }
        }

        Ok(selection.apply(raw_hits, self.top_k))
    }
}

fn build_rerank_prompt(
    template: &str,
    question: &Question,
    hits: &[RawSearchHit],
    top_k: usize,
) -> String {
    let items_text = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "{}. Title: {}\n   Snippet: {}\n   URL: {}",
                i + 1,
                hit.title.as_deref().unwrap_or(""),
                hit.content.as_deref().unwrap_or(""),
                hit.url.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    render(
        template,
        &[
            ("question_text", question.full_text().as_str()),
            ("items_text", items_text.as_str()),
            ("top_k", top_k.to_string().as_str()),
        ],
    )
}
