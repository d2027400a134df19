use async_trait::async_trait;

use super::errors::ProviderError;
use super::models::Transcript;

/// A single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Rendered prompt for this step
    pub prompt: String,
    /// Prior exchanges sent ahead of the prompt
    pub context: Transcript,
    /// Sampling temperature
    pub temperature: f32,
}

/// Port for text-generation providers
///
/// Each call is independent: implementations must not retry, back off or
/// cache. Any failure is reported as a [`ProviderError`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for `request.prompt`, given the prior exchanges in
    /// `request.context`
    ///
    /// # Returns
    /// * `Ok(String)` - Generated text
    /// * `Err(ProviderError)` - Network, authentication, quota or provider-side failure
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
