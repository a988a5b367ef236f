//! Provider fallback decorator
//!
//! Wraps two `ChatCompletion` implementations: the secondary is called only
//! when the primary errors or returns no choices. Consumers see a single
//! provider.

use std::sync::Arc;

use async_trait::async_trait;
use nextcrm_core::{ChatCompletion, ChatMessage, ChatResponse, LlmError};

pub struct FallbackChat {
    primary: Arc<dyn ChatCompletion>,
    secondary: Arc<dyn ChatCompletion>,
    name: String,
}

impl FallbackChat {
    pub fn new(primary: Arc<dyn ChatCompletion>, secondary: Arc<dyn ChatCompletion>) -> Self {
        let name = format!("{}+{}", primary.provider(), secondary.provider());
        Self {
            primary,
            secondary,
            name,
        }
    }
}

#[async_trait]
impl ChatCompletion for FallbackChat {
    fn provider(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let (primary_failure, transient) = match self.primary.complete(messages).await {
            Ok(response) if !response.is_empty() => return Ok(response),
            Ok(_) => ("no choices returned".to_string(), true),
            Err(e) => (e.to_string(), e.is_transient()),
        };

        tracing::warn!(
            primary = self.primary.provider(),
            fallback = self.secondary.provider(),
            reason = %primary_failure,
            transient,
            "Primary chat provider failed, falling back"
        );

        self.secondary
            .complete(messages)
            .await
            .map_err(|e| LlmError::AllProvidersFailed {
                primary: primary_failure,
                fallback: e.to_string(),
            })
    }
}
