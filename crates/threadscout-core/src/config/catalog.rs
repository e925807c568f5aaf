//! Provider catalog
//!
//! Describes every provider the pipeline knows how to build, grouped into
//! sections (query, search, summary), and resolves a user selection into
//! concrete `(provider id, kind, model)` triples.

use crate::error::{Result, ThreadScoutError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Pipeline section a provider plugs into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Query,
    Search,
    Summary,
}

impl SectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Search => "search",
            Self::Summary => "summary",
        }
    }

    /// Whether the section allows several providers at once
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Search)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model offered by an LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderModel {
    pub id: String,
    pub friendly_name: String,
    pub description: String,
}

/// A provider backend (LLM or search API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    /// Backend kind, e.g. "ollama" or "http"
    pub kind: String,
    pub friendly_name: String,
    pub description: String,
    #[serde(default)]
    pub models: Vec<ProviderModel>,
    /// Model used when the selection does not override it
    #[serde(default)]
    pub default_model: Option<String>,
}

/// All providers available for one section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSection {
    pub name: SectionName,
    pub description: String,
    pub providers: Vec<ProviderInfo>,
    pub default_selection: Vec<String>,
}

impl ProviderSection {
    pub fn get(&self, id: &str) -> Option<&ProviderInfo> {
        self.providers.iter().find(|p| p.id == id)
    }
}

/// The user's provider choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSelection {
    #[serde(default = "default_query_provider")]
    pub query: String,

    /// Search providers, in fan-out order
    #[serde(default = "default_search_providers")]
    pub search: Vec<String>,

    #[serde(default = "default_summary_provider")]
    pub summary: String,

    /// Model overrides keyed by provider id
    #[serde(default)]
    pub models: HashMap<String, String>,
}

impl Default for ProviderSelection {
    fn default() -> Self {
        Self {
            query: default_query_provider(),
            search: default_search_providers(),
            summary: default_summary_provider(),
            models: HashMap::new(),
        }
    }
}

fn default_query_provider() -> String {
    "ollama_query".to_string()
}

fn default_search_providers() -> Vec<String> {
    vec!["ollama_search".to_string(), "searxng".to_string()]
}

fn default_summary_provider() -> String {
    "ollama_summary".to_string()
}

/// A selected provider with its effective model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub id: String,
    pub kind: String,
    pub friendly_name: String,
    pub model: Option<String>,
}

/// Resolved providers for every section
#[derive(Debug, Clone)]
pub struct ResolvedSelection {
    pub query: ResolvedProvider,
    pub search: Vec<ResolvedProvider>,
    pub summary: ResolvedProvider,
}

/// Immutable catalog of known providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCatalog {
    pub sections: Vec<ProviderSection>,
}

impl ProviderCatalog {
    /// Catalog of providers this crate can build
    pub fn builtin() -> Self {
        let llama = || ProviderModel {
            id: "llama3.1".to_string(),
            friendly_name: "Llama 3.1".to_string(),
            description: "Default general purpose model.".to_string(),
        };

        Self {
            sections: vec![
                ProviderSection {
                    name: SectionName::Query,
                    description: "LLM to convert a natural-language question into search queries."
                        .to_string(),
                    providers: vec![ProviderInfo {
                        id: "ollama_query".to_string(),
                        kind: "ollama".to_string(),
                        friendly_name: "Ollama (query generation)".to_string(),
                        description: "Local LLM for generating search queries.".to_string(),
                        models: vec![llama()],
                        default_model: Some("llama3.1".to_string()),
                    }],
                    default_selection: vec![default_query_provider()],
                },
                ProviderSection {
                    name: SectionName::Search,
                    description: "Searches for an answer. Can be API or LLM.".to_string(),
                    providers: vec![
                        ProviderInfo {
                            id: "ollama_search".to_string(),
                            kind: "ollama".to_string(),
                            friendly_name: "Ollama (internal answer)".to_string(),
                            description: "Local LLM answering from its own knowledge.".to_string(),
                            models: vec![llama()],
                            default_model: Some("llama3.1".to_string()),
                        },
                        ProviderInfo {
                            id: "searxng".to_string(),
                            kind: "http".to_string(),
                            friendly_name: "SearXNG".to_string(),
                            description:
                                "Self-hosted meta search restricted to Reddit, reranked by the LLM."
                                    .to_string(),
                            models: Vec::new(),
                            default_model: None,
                        },
                    ],
                    default_selection: default_search_providers(),
                },
                ProviderSection {
                    name: SectionName::Summary,
                    description: "LLMs that summarize retrieved context into a final answer."
                        .to_string(),
                    providers: vec![ProviderInfo {
                        id: "ollama_summary".to_string(),
                        kind: "ollama".to_string(),
                        friendly_name: "Ollama (summary)".to_string(),
                        description: "Local LLM summarizer.".to_string(),
                        models: vec![llama()],
                        default_model: Some("llama3.1".to_string()),
                    }],
                    default_selection: vec![default_summary_provider()],
                },
            ],
        }
    }

    /// Get a section by name
    pub fn section(&self, name: SectionName) -> Option<&ProviderSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Resolve one provider id within a section
    pub fn resolve(
        &self,
        section: SectionName,
        id: &str,
        model_overrides: &HashMap<String, String>,
    ) -> Result<ResolvedProvider> {
        let info = self
            .section(section)
            .and_then(|s| s.get(id))
            .ok_or_else(|| {
                ThreadScoutError::Config(format!("Unknown {} provider: {}", section, id))
            })?;

        let model = model_overrides
            .get(id)
            .cloned()
            .or_else(|| info.default_model.clone());

        Ok(ResolvedProvider {
            id: info.id.clone(),
            kind: info.kind.clone(),
            friendly_name: info.friendly_name.clone(),
            model,
        })
    }

    /// Resolve a full selection, failing on the first unknown id
    pub fn resolve_selection(&self, selection: &ProviderSelection) -> Result<ResolvedSelection> {
        if selection.search.is_empty() {
            return Err(ThreadScoutError::Config(
                "at least one search provider must be selected".to_string(),
            ));
        }

        let query = self.resolve(SectionName::Query, &selection.query, &selection.models)?;
        let search = selection
            .search
            .iter()
            .map(|id| self.resolve(SectionName::Search, id, &selection.models))
            .collect::<Result<Vec<_>>>()?;
        let summary = self.resolve(SectionName::Summary, &selection.summary, &selection.models)?;

        Ok(ResolvedSelection {
            query,
            search,
            summary,
        })
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults_resolve() {
        let catalog = ProviderCatalog::builtin();
        let resolved = catalog
            .resolve_selection(&ProviderSelection::default())
            .unwrap();

        assert_eq!(resolved.query.id, "ollama_query");
        assert_eq!(resolved.query.model.as_deref(), Some("llama3.1"));
        let ids: Vec<_> = resolved.search.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ollama_search", "searxng"]);
        assert_eq!(resolved.search[1].model, None);
        assert_eq!(resolved.summary.id, "ollama_summary");
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let catalog = ProviderCatalog::builtin();
        let selection = ProviderSelection {
            search: vec!["searxng".to_string(), "bing".to_string()],
            ..Default::default()
        };

        let err = catalog.resolve_selection(&selection).unwrap_err();
        assert!(matches!(err, ThreadScoutError::Config(_)));
        assert!(err.to_string().contains("bing"));
    }

    #[test]
    fn test_provider_in_wrong_section_rejected() {
        let catalog = ProviderCatalog::builtin();
        let selection = ProviderSelection {
            query: "searxng".to_string(),
            ..Default::default()
        };
        assert!(catalog.resolve_selection(&selection).is_err());
    }

    #[test]
    fn test_model_override() {
        let catalog = ProviderCatalog::builtin();
        let mut overrides = HashMap::new();
        overrides.insert("ollama_summary".to_string(), "qwen2.5".to_string());

        let resolved = catalog
            .resolve(SectionName::Summary, "ollama_summary", &overrides)
            .unwrap();
        assert_eq!(resolved.model.as_deref(), Some("qwen2.5"));
    }

    #[test]
    fn test_section_multiplicity() {
        assert!(SectionName::Search.is_multi());
        assert!(!SectionName::Query.is_multi());
        assert!(!SectionName::Summary.is_multi());
    }
}
