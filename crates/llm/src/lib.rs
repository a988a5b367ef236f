//! Chat completion providers
//!
//! - `DeepSeekClient`: OpenAI-compatible `/v1/chat/completions`
//! - `DoubaoClient`: Volcengine Ark `/responses`
//! - `FallbackChat`: tries a primary provider, then a secondary
//!
//! `build_chat_client` wires them from settings. Callers only ever see
//! `Arc<dyn ChatCompletion>`.

pub mod deepseek;
pub mod doubao;
pub mod fallback;
mod http;

pub use deepseek::DeepSeekClient;
pub use doubao::DoubaoClient;
pub use fallback::FallbackChat;

use std::sync::Arc;

use nextcrm_config::LlmSettings;
use nextcrm_core::{ChatCompletion, LlmError};

/// Build the chat capability from settings
///
/// Doubao is preferred when configured, with DeepSeek as fallback when both
/// keys are present.
pub fn build_chat_client(settings: &LlmSettings) -> Result<Arc<dyn ChatCompletion>, LlmError> {
    let doubao = if settings.doubao.is_configured() {
        Some(DoubaoClient::new(&settings.doubao, settings.timeout())?)
    } else {
        None
    };
    let deepseek = if settings.deepseek.is_configured() {
        Some(DeepSeekClient::new(&settings.deepseek, settings.timeout())?)
    } else {
        None
    };

    let client: Arc<dyn ChatCompletion> = match (doubao, deepseek) {
        (Some(primary), Some(secondary)) => {
            tracing::info!(primary = "doubao", fallback = "deepseek", "Chat providers configured");
            Arc::new(FallbackChat::new(Arc::new(primary), Arc::new(secondary)))
        }
        (Some(only), None) => {
            tracing::info!(provider = "doubao", "Chat provider configured");
            Arc::new(only)
        }
        (None, Some(only)) => {
            tracing::info!(provider = "deepseek", "Chat provider configured");
            Arc::new(only)
        }
        (None, None) => {
            return Err(LlmError::NotConfigured(
                "set DOUBAO_API_KEY and/or DEEPSEEK_API_KEY".to_string(),
            ))
        }
    };

    Ok(client)
}
