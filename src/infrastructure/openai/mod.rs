//! Chat-completions provider adapter

pub mod client;
pub mod errors;
pub mod types;

pub use client::{OpenAiClient, OpenAiClientConfig};
pub use errors::OpenAiApiError;
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
