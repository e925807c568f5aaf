//! Terminal output formatter

use super::is_selected;
use threadscout_core::{
    EvidenceItem, FinalAnswer, ProviderCatalog, ProviderSelection, QuerySet, SearchOutcome,
};

pub fn format_queries(queries: &QuerySet) -> String {
    let mut output = format!("Keyword query: {}\n", queries.keyword_query);

    if !queries.sub_questions.is_empty() {
        output.push_str("Sub-questions:\n");
        for q in &queries.sub_questions {
            output.push_str(&format!("  - {}\n", q));
        }
    }

    output
}

pub fn format_search(outcome: &SearchOutcome) -> String {
    let mut output = format_queries(&outcome.queries);
    output.push('\n');
    output.push_str(&format_evidence(&outcome.evidence));
    output
}

pub fn format_answer(answer: &FinalAnswer) -> String {
    let mut output = format!("{}\n", answer.final_summary.trim_end());

    if !answer.per_source_results.is_empty() {
        output.push_str("\nSources:\n");
        output.push_str(&format_evidence(&answer.per_source_results));
    }

    output
}

fn format_evidence(evidence: &[EvidenceItem]) -> String {
    if evidence.is_empty() {
        return "No evidence found\n".to_string();
    }

    let mut output = String::new();
    for (i, item) in evidence.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. [{}] {}\n",
            i + 1,
            item.source,
            item.title.as_deref().unwrap_or("(untitled)")
        ));
        if let Some(ref url) = item.url {
            output.push_str(&format!("    {}\n", url));
        }

        let lines: Vec<&str> = item.summary.lines().take(5).collect();
        for line in &lines {
            output.push_str(&format!("    {}\n", line));
        }
        if item.summary.lines().count() > 5 {
            output.push_str("    ...\n");
        }
    }

    output
}

pub fn format_catalog(catalog: &ProviderCatalog, selection: &ProviderSelection) -> String {
    let mut output = String::new();

    for section in &catalog.sections {
        let arity = if section.name.is_multi() { "multiple" } else { "single" };
        output.push_str(&format!("{} ({}): {}\n", section.name, arity, section.description));

        for p in &section.providers {
            let marker = if is_selected(selection, &p.id) { "*" } else { " " };
            let model = p
                .default_model
                .as_deref()
                .map(|m| format!(" [{}]", m))
                .unwrap_or_default();
            output.push_str(&format!("  {} {:<16} {}{}\n", marker, p.id, p.friendly_name, model));
        }
        output.push('\n');
    }

    output.push_str("* selected\n");
    output
}
