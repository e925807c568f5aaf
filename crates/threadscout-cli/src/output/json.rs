//! JSON output formatter

use super::is_selected;
use anyhow::Result;
use serde::Serialize;
use threadscout_core::{ProviderCatalog, ProviderSelection};

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

pub fn format_catalog(catalog: &ProviderCatalog, selection: &ProviderSelection) -> Result<String> {
    let sections: Vec<serde_json::Value> = catalog
        .sections
        .iter()
        .map(|section| {
            let providers: Vec<serde_json::Value> = section
                .providers
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "kind": p.kind,
                        "friendly_name": p.friendly_name,
                        "description": p.description,
                        "models": p.models,
                        "default_model": p.default_model,
                        "selected": is_selected(selection, &p.id),
                    })
                })
                .collect();

            serde_json::json!({
                "name": section.name,
                "description": section.description,
                "multi": section.name.is_multi(),
                "default_selection": section.default_selection,
                "providers": providers,
            })
        })
        .collect();

    to_pretty(&sections)
}
