//! Request and response data types shared by every pipeline stage

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A natural-language question as submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Question {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            source: None,
            url: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Body text, or empty when absent
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Title followed by the body (if any) separated by a blank line
    pub fn full_text(&self) -> String {
        match self.body.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(body) => format!("{}\n\n{}", self.title, body),
            None => self.title.clone(),
        }
    }
}

/// Search queries derived from a question
///
/// `keyword_query` is the primary search string handed to search providers.
/// Anything else the query generator produced is kept in `extra` and only
/// forwarded to the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySet {
    pub keyword_query: String,
    #[serde(default)]
    pub sub_questions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuerySet {
    pub fn new(keyword_query: impl Into<String>) -> Self {
        Self {
            keyword_query: keyword_query.into(),
            sub_questions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Query set used when the generator output cannot be understood
    pub fn fallback(question: &Question) -> Self {
        Self::new(question.title.clone())
    }
}

/// A search hit as returned by a meta-search backend, not yet validated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchHit {
    #[serde(default)]
    pub title: Option<String>,
    /// Snippet text
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawSearchHit {
    /// Content if present, otherwise the title, otherwise empty
    pub fn body_text(&self) -> &str {
        [self.content.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or("")
    }
}

/// One normalized unit of retrieved information attributed to a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Provider tag, e.g. "searxng:reddit"
    pub source: String,
    pub url: Option<String>,
    pub title: Option<String>,
    /// Never empty
    pub summary: String,
}

/// Summary used when a backend produced no text at all
pub const EMPTY_SUMMARY: &str = "No content was available for this result.";

impl EvidenceItem {
    pub fn new(source: impl Into<String>, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        let summary = if summary.trim().is_empty() {
            EMPTY_SUMMARY.to_string()
        } else {
            summary
        };

        Self {
            source: source.into(),
            url: None,
            title: None,
            summary,
        }
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }
}

/// Terminal artifact of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub final_summary: String,
    pub per_source_results: Vec<EvidenceItem>,
}
