//! Prompt template store
//!
//! Templates are compiled into the binary and can be overridden by dropping
//! `<name>.txt` into a templates directory.

use crate::config::Config;
use crate::error::{Result, ThreadScoutError};
use std::path::PathBuf;

/// Query generation system prompt
pub const QUERY_TEMPLATE: &str = "query_prompt";
/// LLM internal-answer system prompt
pub const LLM_SEARCH_TEMPLATE: &str = "llm_search_prompt";
/// Reranking prompt (`{question_text}`, `{items_text}`, `{top_k}`)
pub const RERANK_TEMPLATE: &str = "rerank_prompt";
/// Summary prompt (`{question_title}`, `{question_body}`, `{generated_queries}`, `{combined_evidence}`)
pub const SUMMARY_TEMPLATE: &str = "summary_prompt";

const BUILTIN: &[(&str, &str)] = &[
    (QUERY_TEMPLATE, include_str!("../../templates/query_prompt.txt")),
    (
        LLM_SEARCH_TEMPLATE,
        include_str!("../../templates/llm_search_prompt.txt"),
    ),
    (RERANK_TEMPLATE, include_str!("../../templates/rerank_prompt.txt")),
    (SUMMARY_TEMPLATE, include_str!("../../templates/summary_prompt.txt")),
];

/// Loads prompt templates by name
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    override_dir: Option<PathBuf>,
}

impl TemplateStore {
    /// Store serving only the built-in templates
    pub fn builtin() -> Self {
        Self { override_dir: None }
    }

    /// Store that prefers `<dir>/<name>.txt` over the built-in template
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            override_dir: config.templates_dir.clone(),
        }
    }

    /// Load a template by name
    pub fn load(&self, name: &str) -> Result<String> {
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.txt", name));
            if path.is_file() {
                tracing::debug!("Loading template override {}", path.display());
                return Ok(std::fs::read_to_string(&path)?);
            }
        }

        BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| ThreadScoutError::Template(format!("Template not found: {}", name)))
    }
}

/// Substitute `{key}` placeholders in a single pass
///
/// Unknown placeholders and other braces (e.g. JSON examples) are left
/// untouched, and substituted values are never re-scanned.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_templates_load() {
        let store = TemplateStore::builtin();
        for name in [
            QUERY_TEMPLATE,
            LLM_SEARCH_TEMPLATE,
            RERANK_TEMPLATE,
            SUMMARY_TEMPLATE,
        ] {
            let text = store.load(name).unwrap();
            assert!(!text.trim().is_empty(), "{} is empty", name);
        }
    }

    #[test]
    fn test_rerank_template_has_placeholders() {
        let text = TemplateStore::builtin().load(RERANK_TEMPLATE).unwrap();
        assert!(text.contains("{question_text}"));
        assert!(text.contains("{items_text}"));
        assert!(text.contains("{top_k}"));
    }

    #[test]
    fn test_unknown_template() {
        let err = TemplateStore::builtin().load("nope").unwrap_err();
        assert!(matches!(err, ThreadScoutError::Template(_)));
    }

    #[test]
    fn test_override_dir_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("rerank_prompt.txt"), "custom {top_k}").unwrap();

        let store = TemplateStore::with_dir(dir.path());
        assert_eq!(store.load(RERANK_TEMPLATE).unwrap(), "custom {top_k}");
        // Templates missing from the directory fall back to the built-ins
        assert!(store.load(SUMMARY_TEMPLATE).unwrap().contains("{combined_evidence}"));
    }

    #[test]
    fn test_render_replaces_known_keys() {
        let out = render("Pick {top_k} of:\n{items}", &[("top_k", "3"), ("items", "a, b")]);
        assert_eq!(out, "Pick 3 of:\na, b");
    }

    #[test]
    fn test_render_leaves_unknown_and_json_braces() {
        let out = render(r#"{"keyword_query": "x"} {missing} {k}"#, &[("k", "v")]);
        assert_eq!(out, r#"{"keyword_query": "x"} {missing} v"#);
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{a}{b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b}B");
    }

    #[test]
    fn test_render_unclosed_brace() {
        assert_eq!(render("tail {open", &[("open", "x")]), "tail {open");
    }
}
