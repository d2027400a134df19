pub mod config;
pub mod form;
pub mod output;
pub mod run;
pub mod template;
pub mod transcript;

pub use config::{
    Config, LogFormat, LoggingConfig, MemoryScope, PipelineConfig, ProviderConfig,
    RotationPolicy, ServerConfig, TemplatesConfig,
};
pub use form::{FormSelection, ProjectLanguage, ProjectType};
pub use output::{OutputBlock, OutputView};
pub use run::{
    InvalidTransition, PipelineResult, PipelineStep, RunEvent, RunFailure, RunOutcome, RunState,
};
pub use template::{PromptTemplate, TemplateSet, TemplateVariables};
pub use transcript::{Exchange, Transcript};
