//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not found. Set the {env} environment variable.")]
    MissingApiKey { env: String },

    #[error("Unknown LLM provider: '{0}'. Supported: groq, openai")]
    UnknownProvider(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this error means the client was never usable
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::MissingApiKey { .. } | LlmError::UnknownProvider(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message() {
        let err = LlmError::MissingApiKey {
            env: "GROQ_API_KEY".to_string(),
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_unknown_provider_is_configuration() {
        let err = LlmError::UnknownProvider("anthropic".to_string());
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'anthropic'"));
    }

    #[test]
    fn test_api_error_message() {
        let err = LlmError::ApiError {
            status: 401,
            message: "Invalid API Key".to_string(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "API error 401: Invalid API Key");
    }

    #[test]
    fn test_rate_limited_message() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(7),
        };
        assert!(err.to_string().contains("7s"));
    }
}
