//! Providers command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use threadscout_core::{Config, ProviderCatalog};

pub fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let catalog = ProviderCatalog::builtin();
    print!(
        "{}",
        output::format_catalog(&catalog, &config.providers, format)?
    );
    Ok(())
}
