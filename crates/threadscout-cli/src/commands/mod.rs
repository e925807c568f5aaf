//! CLI command handlers

pub mod answer;
pub mod health;
pub mod providers;
pub mod queries;
pub mod search;

use crate::app::QuestionArgs;
use anyhow::Result;
use std::io::Read;
use std::sync::Arc;
use threadscout_core::{Config, HttpLLMClient, Pipeline, Question, ThreadScoutError};

/// Build the question from `--json` or from the positional title and flags
pub fn read_question(args: QuestionArgs) -> Result<Question> {
    let question = match &args.json {
        Some(path) => {
            let raw = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path)?
            };
            serde_json::from_str::<Question>(&raw).map_err(|e| {
                ThreadScoutError::InvalidInput(format!("invalid question JSON: {}", e))
            })?
        }
        None => {
            let mut question = Question::new(args.title.join(" "));
            question.body = args.body;
            question.source = args.source;
            question.url = args.url;
            question
        }
    };

    if question.title.trim().is_empty() {
        return Err(
            ThreadScoutError::InvalidInput("a question title is required".to_string()).into(),
        );
    }
    Ok(question)
}

/// Build the pipeline around one shared LLM client
pub fn build_pipeline(config: &Config) -> Result<(Pipeline, Arc<HttpLLMClient>)> {
    let client = Arc::new(HttpLLMClient::new(config.llm_service.clone())?);
    let pipeline = Pipeline::from_config(config, client.clone())?;
    Ok((pipeline, client))
}

pub fn log_llm_metrics(client: &HttpLLMClient) {
    let metrics = client.metrics();
    tracing::debug!(
        "LLM calls: {} requests, {} errors, {:.0}ms average latency",
        metrics.total_requests,
        metrics.total_errors,
        metrics.avg_latency_ms
    );
}
