//! Error types for LLM provider implementations.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when calling an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to serialize/deserialize data.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Provider identifier is not one of the supported providers.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid or empty response from provider.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider returned a non-success status.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Map a non-success HTTP status to the matching error variant.
    pub fn from_status(vendor: &str, status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationError(body),
            429 => LlmError::RateLimitExceeded(body),
            _ => LlmError::ProviderError(format!("{} API error {}: {}", vendor, status, body)),
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        let err = LlmError::from_status("OpenAI", StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(matches!(err, LlmError::AuthenticationError(_)));

        let err = LlmError::from_status("OpenAI", StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(matches!(err, LlmError::RateLimitExceeded(_)));

        let err = LlmError::from_status("Claude", StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(err, LlmError::ProviderError(_)));
        assert!(err.to_string().contains("Claude API error 502"));
    }

    #[test]
    fn test_unknown_provider_message() {
        let err = LlmError::UnknownProvider("llama".into());
        assert_eq!(err.to_string(), "Unknown provider: llama");
    }
}
