use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::errors::OpenAiApiError;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorResponse};
use crate::domain::errors::ProviderError;
use crate::domain::models::{ProviderConfig, Transcript};
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the chat-completions HTTP client
#[derive(Clone)]
pub struct OpenAiClientConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL for the API (without the `/v1/...` path)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Maximum tokens generated per completion
    pub max_tokens: u32,

    /// Request timeout; `None` leaves the HTTP client default in place
    pub timeout_secs: Option<u64>,

    /// Optional system message sent first in every conversation
    pub system_prompt: Option<String>,
}

impl OpenAiClientConfig {
    /// Build from provider configuration and an already-resolved API key
    pub fn from_provider(provider: &ProviderConfig, api_key: String) -> Self {
        Self {
            api_key,
            base_url: provider.base_url.clone(),
            model: provider.model.clone(),
            max_tokens: provider.max_tokens,
            timeout_secs: provider.timeout_secs,
            system_prompt: provider.system_prompt.clone(),
        }
    }
}

impl std::fmt::Debug for OpenAiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClientConfig")
            .field("api_key", &SecretScrubber::new().mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// HTTP client for an OpenAI-compatible chat-completions API
///
/// Each call is a single request: no retry, no backoff, no caching.
/// Rate limits and billing are the provider's concern.
pub struct OpenAiClient {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Returns
    /// * `Result<Self, OpenAiApiError>` - Client instance or error
    ///
    /// # Example
    /// ```no_run
    /// use projectgpt::infrastructure::openai::{OpenAiClient, OpenAiClientConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = OpenAiClientConfig {
    ///     api_key: "sk-...".to_string(),
    ///     base_url: "https://api.openai.com".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    ///     max_tokens: 256,
    ///     timeout_secs: None,
    ///     system_prompt: None,
    /// };
    /// let client = OpenAiClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OpenAiClientConfig) -> Result<Self, OpenAiApiError> {
        info!(
            "Initializing completion client: base_url={}, model={}, max_tokens={}, api_key={}",
            config.base_url,
            config.model,
            config.max_tokens,
            SecretScrubber::new().mask_key(&config.api_key)
        );

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| OpenAiApiError::InvalidKeyFormat(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = ReqwestClient::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt,
        })
    }

    /// Conversation for one call: optional system message, the transcript as
    /// alternating user/assistant turns, then the prompt.
    pub fn build_messages(&self, prompt: &str, context: &Transcript) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(context.len() * 2 + 2);

        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        for exchange in context {
            messages.push(ChatMessage::user(exchange.input.clone()));
            messages.push(ChatMessage::assistant(exchange.output.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        messages
    }

    /// Send a chat-completion request and return the parsed response
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub async fn send_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!("POST {}", url);

        let response = self.http_client.post(&url).json(request).send().await?;

        self.handle_response(response).await
    }

    /// Handle HTTP response and convert to typed result
    async fn handle_response(
        &self,
        response: Response,
    ) -> Result<ChatCompletionResponse, OpenAiApiError> {
        let status = response.status();

        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OpenAiApiError::MalformedResponse(e.to_string()))
    }

    /// Handle error response and classify error type
    async fn handle_error_response(response: Response) -> OpenAiApiError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        warn!(
            "API error ({}): {}",
            status,
            SecretScrubber::new().scrub(&message)
        );

        OpenAiApiError::from_status(status, message)
    }

    /// Extract the generated text from the first choice
    fn extract_text(response: ChatCompletionResponse) -> Result<String, OpenAiApiError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiApiError::MalformedResponse("response has no choices".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("Completion truncated at max_tokens");
        }

        choice
            .message
            .content
            .map(|text| text.trim().to_string())
            .ok_or_else(|| OpenAiApiError::MalformedResponse("choice has no text content".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(&request.prompt, &request.context),
            temperature: Some(request.temperature),
            max_tokens: Some(self.max_tokens),
        };

        let started = Instant::now();
        let response = self.send_chat(&chat_request).await?;

        if let Some(usage) = &response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Completion succeeded"
            );
        }

        Ok(Self::extract_text(response)?)
    }
}
