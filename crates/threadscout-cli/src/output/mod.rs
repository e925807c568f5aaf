//! Output formatters

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use threadscout_core::{
    FinalAnswer, ProviderCatalog, ProviderSelection, QuerySet, Question, SearchOutcome,
};

/// Format generated queries
pub fn format_queries(queries: &QuerySet, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => json::to_pretty(queries)?,
        OutputFormat::Md => markdown::format_queries(queries),
        OutputFormat::Cli => terminal::format_queries(queries),
    })
}

/// Format queries plus gathered evidence
pub fn format_search(outcome: &SearchOutcome, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => json::to_pretty(outcome)?,
        OutputFormat::Md => markdown::format_search(outcome),
        OutputFormat::Cli => terminal::format_search(outcome),
    })
}

/// Format the final answer with its sources
pub fn format_answer(
    question: &Question,
    answer: &FinalAnswer,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => json::to_pretty(answer)?,
        OutputFormat::Md => markdown::format_answer(question, answer),
        OutputFormat::Cli => terminal::format_answer(answer),
    })
}

/// Format the provider catalog, marking the selected providers
pub fn format_catalog(
    catalog: &ProviderCatalog,
    selection: &ProviderSelection,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => json::format_catalog(catalog, selection)?,
        OutputFormat::Md => markdown::format_catalog(catalog, selection),
        OutputFormat::Cli => terminal::format_catalog(catalog, selection),
    })
}

/// Whether `id` is part of the configured selection
pub(crate) fn is_selected(selection: &ProviderSelection, id: &str) -> bool {
    selection.query == id || selection.summary == id || selection.search.iter().any(|s| s == id)
}
