//! Implementation of the `projectgpt options` command.

use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ProjectLanguage, ProjectType};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OptionEntry {
    pub label: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionsOutput {
    pub project_types: Vec<OptionEntry>,
    pub languages: Vec<OptionEntry>,
}

impl OptionsOutput {
    pub fn collect() -> Self {
        Self {
            project_types: ProjectType::ALL
                .into_iter()
                .map(|t| OptionEntry {
                    label: t.label(),
                    slug: t.slug(),
                })
                .collect(),
            languages: ProjectLanguage::ALL
                .into_iter()
                .map(|l| OptionEntry {
                    label: l.label(),
                    slug: l.slug(),
                })
                .collect(),
        }
    }
}

impl CommandOutput for OptionsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Project types:".to_string()];
        for entry in &self.project_types {
            lines.push(format!("  {:<22} {}", entry.slug, entry.label));
        }
        lines.push("\nLanguages:".to_string());
        for entry in &self.languages {
            lines.push(format!("  {:<22} {}", entry.slug, entry.label));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) {
    output(&OptionsOutput::collect(), json_mode);
}
