//! DeepSeek chat client (OpenAI-compatible)

use std::time::Duration;

use async_trait::async_trait;
use nextcrm_config::DeepSeekSettings;
use nextcrm_core::{ChatChoice, ChatCompletion, ChatMessage, ChatResponse, ChatRole, LlmError};
use serde::{Deserialize, Serialize};

use crate::http;

const PROVIDER: &str = "deepseek";
const CHAT_PATH: &str = "v1/chat/completions";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    role: Option<ChatRole>,
    #[serde(default)]
    content: Option<String>,
}

/// Client for DeepSeek's chat completions endpoint
pub struct DeepSeekClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl DeepSeekClient {
    pub fn new(settings: &DeepSeekSettings, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: http::build_client(PROVIDER, timeout)?,
            url: http::join_url(&settings.base_url, CHAT_PATH),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

/// Translate a DeepSeek response body into the shared response shape
pub(crate) fn parse_response(body: &str) -> Result<ChatResponse, LlmError> {
    let raw: CompletionResponse = http::decode(PROVIDER, body)?;

    let choices = raw
        .choices
        .into_iter()
        .map(|choice| ChatChoice {
            message: ChatMessage::new(
                choice.message.role.unwrap_or(ChatRole::Assistant),
                choice.message.content.unwrap_or_default(),
            ),
            finish_reason: choice.finish_reason,
        })
        .collect();

    Ok(ChatResponse { choices })
}

#[async_trait]
impl ChatCompletion for DeepSeekClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let body =
            http::post_json(&self.client, PROVIDER, &self.url, &self.api_key, &request).await?;
        let response = parse_response(&body)?;

        tracing::debug!(
            provider = PROVIDER,
            choices = response.choices.len(),
            "Chat completion received"
        );
        Ok(response)
    }
}
