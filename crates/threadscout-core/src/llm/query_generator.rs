//! Query generation: question -> search queries

use super::response::strip_code_fences;
use super::templates::{TemplateStore, QUERY_TEMPLATE};
use super::{ChatMessage, ChatOptions, LLMClient};
use crate::error::Result;
use crate::models::{QuerySet, Question};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Query generation trait
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    /// Derive search queries from a question
    ///
    /// Malformed model output is normalized into a fallback query set; only a
    /// failure to reach the model is an error.
    async fn generate(&self, question: &Question) -> Result<QuerySet>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Query generator backed by an LLM service
pub struct HttpQueryGenerator {
    client: Arc<dyn LLMClient>,
    system_prompt: String,
    model: Option<String>,
}

impl HttpQueryGenerator {
    pub fn new(
        client: Arc<dyn LLMClient>,
        templates: &TemplateStore,
        model: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            system_prompt: templates.load(QUERY_TEMPLATE)?,
            model,
        })
    }
}

#[async_trait]
impl QueryGenerator for HttpQueryGenerator {
    async fn generate(&self, question: &Question) -> Result<QuerySet> {
        let messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(build_question_text(question)),
        ];
        let options = ChatOptions::default().with_model(self.model.clone());

        let response = self.client.chat_completion(messages, &options).await?;

        let queries = parse_query_response(&response, question);
        tracing::info!(
            "Generated keyword query {:?} with {} sub-questions",
            queries.keyword_query,
            queries.sub_questions.len()
        );
        Ok(queries)
    }

    fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.client.model_name())
    }
}

fn build_question_text(question: &Question) -> String {
    format!(
        "Title: {}\nBody: {}\nSource: {}\nURL: {}",
        question.title,
        question.body_text(),
        question.source.as_deref().unwrap_or(""),
        question.url.as_deref().unwrap_or("")
    )
}

/// Normalize model output into a query set
///
/// Accepts `keyword_query` as a string or `keyword_queries` as a list (first
/// non-empty entry wins). Anything that is not a JSON object with a usable
/// keyword query yields [`QuerySet::fallback`].
pub fn parse_query_response(response: &str, question: &Question) -> QuerySet {
    let parsed: Value = match serde_json::from_str(strip_code_fences(response)) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to parse query JSON: {}, using question title", e);
            tracing::debug!("Raw LLM response: {}", response);
            return QuerySet::fallback(question);
        }
    };

    let Value::Object(mut map) = parsed else {
        tracing::warn!("Query generator did not return a JSON object, using question title");
        return QuerySet::fallback(question);
    };

    let keyword_query = map
        .get("keyword_query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            map.get("keyword_queries")
                .and_then(Value::as_array)
                .and_then(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(str::trim)
                        .find(|s| !s.is_empty())
                })
        })
        .map(str::to_string);

    let Some(keyword_query) = keyword_query else {
        tracing::warn!("Query generator returned no keyword query, using question title");
        return QuerySet::fallback(question);
    };

    map.remove("keyword_query");
    let sub_questions = match map.remove("sub_questions") {
        Some(Value::Array(arr)) => arr
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    QuerySet {
        keyword_query,
        sub_questions,
        extra: map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("How to fix X").with_body("X crashes on start")
    }

    #[test]
    fn test_parse_valid_object() {
        let response = r#"{"keyword_query": "fix X crash", "sub_questions": ["what is X?", 3], "intent": "fix"}"#;
        let qs = parse_query_response(response, &question());

        assert_eq!(qs.keyword_query, "fix X crash");
        assert_eq!(qs.sub_questions, vec!["what is X?".to_string()]);
        assert_eq!(qs.extra.get("intent"), Some(&Value::String("fix".into())));
        assert!(!qs.extra.contains_key("keyword_query"));
    }

    #[test]
    fn test_parse_keyword_queries_list() {
        let response = r#"```json
{"keyword_queries": ["", "X crash fix", "X startup"], "sub_questions": []}
```"#;
        let qs = parse_query_response(response, &question());
        assert_eq!(qs.keyword_query, "X crash fix");
        assert!(qs.extra.contains_key("keyword_queries"));
    }

    #[test]
    fn test_parse_non_json_falls_back() {
        let qs = parse_query_response("Sure! Here are some queries: fix X", &question());
        assert_eq!(qs, QuerySet::fallback(&question()));
        assert_eq!(qs.keyword_query, "How to fix X");
        assert!(qs.sub_questions.is_empty());
    }

    #[test]
    fn test_parse_non_object_falls_back() {
        let qs = parse_query_response(r#"["fix X"]"#, &question());
        assert_eq!(qs.keyword_query, "How to fix X");
    }

    #[test]
    fn test_parse_missing_keyword_falls_back() {
        let qs = parse_query_response(r#"{"sub_questions": ["a"]}"#, &question());
        assert_eq!(qs, QuerySet::fallback(&question()));
    }

    #[test]
    fn test_question_text_includes_optional_fields() {
        let q = question().with_url("https://example.com/q");
        let text = build_question_text(&q);
        assert!(text.contains("Title: How to fix X"));
        assert!(text.contains("Body: X crashes on start"));
        assert!(text.contains("Source: \n"));
        assert!(text.ends_with("URL: https://example.com/q"));
    }
}
