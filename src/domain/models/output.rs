//! Toolkit-independent output view of a run.

use serde::Serialize;
use std::fmt;

use super::run::{PipelineStep, RunOutcome};

/// One labeled text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputBlock {
    pub label: &'static str,
    pub text: String,
}

/// Labeled blocks for every produced field, then the error (if any) in place
/// of the blocks that were never produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputView {
    pub blocks: Vec<OutputBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputView {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let blocks = PipelineStep::ALL
            .into_iter()
            .filter_map(|step| {
                outcome.result.get(step).map(|text| OutputBlock {
                    label: step.label(),
                    text: text.to_string(),
                })
            })
            .collect();

        Self {
            blocks,
            error: outcome.failure.as_ref().map(|f| f.message.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.error.is_none()
    }
}

impl fmt::Display for OutputView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for block in &self.blocks {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{}", block.label)?;
            writeln!(f, "{}", block.text)?;
        }
        if let Some(error) = &self.error {
            if !first {
                writeln!(f)?;
            }
            writeln!(f, "ERROR")?;
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}
