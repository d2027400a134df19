//! Domain layer for ProjectGPT
//!
//! Form values, prompt templates, transcripts, run state and the
//! completion-client port. Nothing here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{PipelineError, ProviderError, TemplateError, ValidationError};
