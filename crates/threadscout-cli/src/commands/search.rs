//! Search command

use super::{build_pipeline, log_llm_metrics, read_question};
use crate::app::{OutputFormat, QuestionArgs};
use crate::output;
use anyhow::Result;
use threadscout_core::Config;

pub async fn run(args: QuestionArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let question = read_question(args)?;
    let (pipeline, client) = build_pipeline(config)?;

    let outcome = pipeline.generate_search(&question).await?;
    log_llm_metrics(&client);

    print!("{}", output::format_search(&outcome, format)?);
    Ok(())
}
