//! Errors raised by chat completion providers

use thiserror::Error;

/// Result alias for chat completion calls
pub type Result<T> = std::result::Result<T, LlmError>;

/// Failure while talking to a language model provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// Connection, DNS or body transfer failure
    #[error("network error calling {provider}: {message}")]
    Network { provider: String, message: String },

    /// The transport gave up waiting for the provider
    #[error("{provider} did not respond within the configured timeout")]
    Timeout { provider: String },

    /// Provider answered with a non-success status
    #[error("{provider} API error (status {status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider answered 2xx with a body we could not decode
    #[error("invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    /// No provider credentials were configured
    #[error("no chat provider configured: {0}")]
    NotConfigured(String),

    /// Primary and fallback providers both failed
    #[error("all providers failed (primary: {primary}; fallback: {fallback})")]
    AllProvidersFailed { primary: String, fallback: String },
}

impl LlmError {
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether resubmitting the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Network { .. } | LlmError::Timeout { .. } => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::AllProvidersFailed { .. } => true,
            LlmError::InvalidResponse { .. } | LlmError::NotConfigured(_) => false,
        }
    }
}
