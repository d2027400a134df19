//! ProjectGPT - project idea generator
//!
//! Takes a project type, a programming language and a topic, then chains three
//! completion prompts: a project idea, the tools to build it, and the steps to
//! implement it. Each prompt's output feeds the next one.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Form values, templates, transcripts, run state and ports
//! - **Service Layer** (`services`): The sequential completion pipeline
//! - **Infrastructure Layer** (`infrastructure`): Provider client, configuration, logging
//! - **Adapters** (`adapters`): Web UI
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use projectgpt::domain::models::{FormSelection, ProjectLanguage, ProjectType};
//!
//! let form = FormSelection::new(ProjectType::MachineLearning, ProjectLanguage::Python, "bird detection");
//! let outcome = pipeline.generate(&form).await?;
//! println!("{}", projectgpt::domain::models::OutputView::from_outcome(&outcome));
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{PipelineError, ProviderError, TemplateError, ValidationError};
pub use domain::models::{
    Config, FormSelection, OutputView, PipelineResult, PipelineStep, ProjectLanguage,
    ProjectType, RunOutcome, RunState, TemplateSet, Transcript,
};
pub use domain::ports::{CompletionClient, CompletionRequest};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::CompletionPipeline;
