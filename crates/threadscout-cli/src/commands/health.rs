//! Health command

use super::build_pipeline;
use crate::app::OutputFormat;
use anyhow::Result;
use threadscout_core::Config;

pub fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let (pipeline, _client) = build_pipeline(config)?;
    let providers = pipeline.fan_out().provider_ids();

    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "status": "ok",
                "search_providers": providers,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        _ => println!("ok"),
    }
    Ok(())
}
