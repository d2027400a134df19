use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::ProviderError;

/// Errors that can occur when calling the chat-completions API
#[derive(Error, Debug)]
pub enum OpenAiApiError {
    /// Invalid request parameters (HTTP 400, 404, 422)
    #[error("Invalid request ({0}): {1}")]
    InvalidRequest(StatusCode, String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed: {0}")]
    InvalidApiKey(String),

    /// Forbidden - permission denied or region not supported (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Rate limit or quota exceeded (HTTP 429)
    #[error("Rate limit or quota exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error from the provider (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body could not be understood
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// API key contains characters not allowed in a header
    #[error("Invalid API key format: {0}")]
    InvalidKeyFormat(String),

    /// Unknown or unexpected status
    #[error("Unexpected status ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl OpenAiApiError {
    /// Classify a non-success response
    ///
    /// `message` is the provider's error message when the body carried one,
    /// otherwise the raw body.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::InvalidRequest(status, message)
            }
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded(message),
            status if status.is_server_error() => Self::ServerError(status, message),
            _ => Self::UnknownError(status, message),
        }
    }
}

impl From<OpenAiApiError> for ProviderError {
    fn from(err: OpenAiApiError) -> Self {
        match err {
            OpenAiApiError::InvalidRequest(status, message)
            | OpenAiApiError::UnknownError(status, message) => Self::Rejected {
                status: status.as_u16(),
                message,
            },
            OpenAiApiError::InvalidApiKey(message)
            | OpenAiApiError::Forbidden(message)
            | OpenAiApiError::InvalidKeyFormat(message) => Self::Authentication(message),
            OpenAiApiError::RateLimitExceeded(message) => Self::QuotaExceeded(message),
            OpenAiApiError::ServerError(status, message) => Self::Server {
                status: status.as_u16(),
                message,
            },
            OpenAiApiError::NetworkError(e) if e.is_timeout() => Self::Timeout,
            OpenAiApiError::NetworkError(e) if e.is_decode() => {
                Self::MalformedResponse(e.to_string())
            }
            OpenAiApiError::NetworkError(e) => Self::Network(e.to_string()),
            OpenAiApiError::MalformedResponse(message) => Self::MalformedResponse(message),
        }
    }
}
