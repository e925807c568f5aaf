//! Markdown output formatter

use super::is_selected;
use threadscout_core::{
    EvidenceItem, FinalAnswer, ProviderCatalog, ProviderSelection, QuerySet, Question,
    SearchOutcome,
};

pub fn format_queries(queries: &QuerySet) -> String {
    let mut output = String::from("# Search Queries\n\n");
    output.push_str(&format!("- **Keyword query**: `{}`\n", queries.keyword_query));

    if !queries.sub_questions.is_empty() {
        output.push_str("\n## Sub-questions\n\n");
        for q in &queries.sub_questions {
            output.push_str(&format!("- {}\n", q));
        }
    }

    output
}

pub fn format_search(outcome: &SearchOutcome) -> String {
    let mut output = format_queries(&outcome.queries);
    output.push_str("\n# Evidence\n\n");
    output.push_str(&format_evidence(&outcome.evidence));
    output
}

pub fn format_answer(question: &Question, answer: &FinalAnswer) -> String {
    let mut output = format!("# {}\n\n", question.title);
    output.push_str(answer.final_summary.trim_end());
    output.push_str("\n\n## Sources\n\n");
    output.push_str(&format_evidence(&answer.per_source_results));
    output
}

fn format_evidence(evidence: &[EvidenceItem]) -> String {
    if evidence.is_empty() {
        return "*No evidence found*\n".to_string();
    }

    let mut output = String::new();
    for (i, item) in evidence.iter().enumerate() {
        let title = item.title.as_deref().unwrap_or(&item.source);
        match item.url {
            Some(ref url) => output.push_str(&format!("### {}. [{}]({})\n\n", i + 1, title, url)),
            None => output.push_str(&format!("### {}. {}\n\n", i + 1, title)),
        }
        output.push_str(&format!("- **Source**: `{}`\n\n", item.source));
        output.push_str(&item.summary);
        output.push_str("\n\n---\n\n");
    }

    output
}

pub fn format_catalog(catalog: &ProviderCatalog, selection: &ProviderSelection) -> String {
    let mut output = String::from("# Providers\n\n");

    for section in &catalog.sections {
        output.push_str(&format!("## {}\n\n{}\n\n", section.name, section.description));
        output.push_str("| Selected | ID | Name | Default model |\n");
        output.push_str("|---|---|---|---|\n");
        for p in &section.providers {
            output.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                if is_selected(selection, &p.id) { "yes" } else { "" },
                p.id,
                p.friendly_name,
                p.default_model.as_deref().unwrap_or("-")
            ));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_links_sources() {
        let answer = FinalAnswer {
            final_summary: "Reinstall the driver.".to_string(),
            per_source_results: vec![EvidenceItem::new("searxng:reddit", "It worked")
                .with_title(Some("Driver issue".to_string()))
                .with_url(Some("https://redd.it/abc".to_string()))],
        };

        let output = format_answer(&Question::new("Fix X"), &answer);
        assert!(output.starts_with("# Fix X\n\nReinstall the driver."));
        assert!(output.contains("### 1. [Driver issue](https://redd.it/abc)"));
    }
}
