//! Chat completion capability
//!
//! OpenAI-style message and response shapes plus the `ChatCompletion` trait.
//! Providers translate their own wire formats into these types so callers
//! never depend on which vendor (or how many) sits behind the trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// One completion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Completion result; may legitimately carry zero choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Response holding a single assistant message
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage::assistant(text),
                finish_reason: Some("stop".to_string()),
            }],
        }
    }

    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Chat completion capability
///
/// One call, one outcome: implementations own their transport timeout and
/// must not retry silently unless that is their documented purpose (see the
/// fallback decorator in `nextcrm-llm`).
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Short provider name used in logs and errors
    fn provider(&self) -> &str;

    /// Complete the given conversation
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;
}
