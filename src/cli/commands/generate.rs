//! Implementation of the `projectgpt generate` command.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use super::build_pipeline;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    Config, FormSelection, OutputView, ProjectLanguage, ProjectType, RunOutcome,
};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project type, by label or slug (e.g. "Machine Learning" or machine-learning)
    #[arg(short = 'p', long, default_value = "data-engineering")]
    pub project_type: ProjectType,

    /// Programming language, by label or slug (e.g. "C/C++" or c-cpp)
    #[arg(short, long, default_value = "python")]
    pub language: ProjectLanguage,

    /// Free-text topic; must not be empty
    #[arg(short, long)]
    pub topic: String,
}

impl GenerateArgs {
    pub fn form(&self) -> FormSelection {
        FormSelection::new(self.project_type, self.language, self.topic.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub output: OutputView,
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        self.output.to_string().trim_end().to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: GenerateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let form = args.form();
    // Rejected before any client is built or call issued
    form.validate()?;

    let pipeline = build_pipeline(config)?;
    let outcome = pipeline.generate(&form).await?;

    let result = GenerateOutput {
        output: OutputView::from_outcome(&outcome),
        outcome,
    };
    output(&result, json_mode);

    if let Some(failure) = &result.outcome.failure {
        bail!("Generation stopped at the {} step", failure.step);
    }
    Ok(())
}
