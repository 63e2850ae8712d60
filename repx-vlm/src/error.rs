//! Error types for the model backends

use thiserror::Error;

/// Result type alias for backend calls
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Longest slice of an error body kept in a [`ProviderError::ApiError`]
const BODY_EXCERPT_CHARS: usize = 500;

/// Errors raised while talking to a model backend
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure: connection refused, timeout, TLS
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend error (status {status}): {message}")]
    ApiError {
        status: u16,
        /// Excerpt of the response body
        message: String,
    },

    /// Response envelope did not have the expected shape
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Create an API error, keeping only the head of the body
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = match body.char_indices().nth(BODY_EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body,
        };
        Self::ApiError { status, message }
    }
}

/// Errors raised while constructing a backend client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown backend: {0}. Must be one of: vllm_llava, vllm_qwen, openai_gpt4v, openai_gpt4o, gemini_pro")]
    UnknownBackend(String),

    #[error("{backend} requires an API key")]
    MissingApiKey { backend: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_truncates_long_bodies() {
        let err = ProviderError::api_error(502, "x".repeat(2000));
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), BODY_EXCERPT_CHARS + 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
