//! Domain errors for the ProjectGPT pipeline.

use thiserror::Error;

use super::models::run::{InvalidTransition, PipelineStep};

/// Form input that cannot trigger a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Topic must not be empty")]
    EmptyTopic,

    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("Unknown programming language: {0}")]
    UnknownLanguage(String),
}

/// Errors raised while rendering or assembling prompt templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template '{template}' is missing a value for placeholder '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("Template '{template}' references '{variable}', which is not available at this step")]
    UnexpectedVariable { template: String, variable: String },
}

/// Failures reported by a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit or quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Provider server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("A generation is already running")]
    Busy,

    #[error("Failed to render the {step} prompt: {source}")]
    Template {
        step: PipelineStep,
        #[source]
        source: TemplateError,
    },

    #[error("{step} completion failed: {source}")]
    Provider {
        step: PipelineStep,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl PipelineError {
    /// The step at which the run stopped, if it got that far.
    pub const fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::Template { step, .. } | Self::Provider { step, .. } => Some(*step),
            Self::Validation(_) | Self::Busy | Self::InvalidTransition(_) => None,
        }
    }
}
