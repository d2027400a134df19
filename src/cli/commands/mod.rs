//! CLI command implementations.

pub mod generate;
pub mod options;
pub mod serve;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::models::{Config, TemplateSet};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::openai::{OpenAiClient, OpenAiClientConfig};
use crate::services::CompletionPipeline;

/// Wire the provider client, templates and pipeline from `config`
pub fn build_pipeline(config: &Config) -> Result<Arc<CompletionPipeline>> {
    let api_key = ConfigLoader::api_key(config)?.to_string();
    let client = OpenAiClient::new(OpenAiClientConfig::from_provider(&config.provider, api_key))
        .context("Failed to create completion client")?;
    let templates =
        TemplateSet::from_config(&config.templates).context("Invalid prompt templates")?;

    Ok(Arc::new(CompletionPipeline::new(
        Arc::new(client),
        templates,
        config.pipeline.clone(),
    )))
}
