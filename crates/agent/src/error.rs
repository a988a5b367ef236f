//! Intake turn failures
//!
//! Only these cross the agent boundary. Irregular model output is absorbed
//! by the splitter and never shows up here.

use nextcrm_core::LlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    /// Transport or provider failure calling the chat capability
    #[error("language model unavailable: {0}")]
    ModelUnavailable(#[source] LlmError),

    /// Provider answered without a usable completion
    #[error("language model returned no reply")]
    EmptyModelResponse,

    /// Caller cancelled the turn while the model call was in flight
    #[error("turn cancelled")]
    Cancelled,
}

impl IntakeError {
    /// Whether resubmitting the same turn is expected to help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IntakeError::ModelUnavailable(_) | IntakeError::EmptyModelResponse
        )
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            IntakeError::ModelUnavailable(_) => "model_unavailable",
            IntakeError::EmptyModelResponse => "empty_model_response",
            IntakeError::Cancelled => "cancelled",
        }
    }
}

impl From<LlmError> for IntakeError {
    fn from(err: LlmError) -> Self {
        IntakeError::ModelUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        let unavailable = IntakeError::from(LlmError::Timeout {
            provider: "doubao".into(),
        });
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.code(), "model_unavailable");
        assert!(IntakeError::EmptyModelResponse.is_retryable());
        assert!(!IntakeError::Cancelled.is_retryable());
    }

    #[test]
    fn test_source_is_kept() {
        use std::error::Error as _;
        let err = IntakeError::ModelUnavailable(LlmError::NotConfigured("none".into()));
        assert!(err.source().is_some());
    }
}
