//! Doubao chat client (Volcengine Ark Responses API)
//!
//! The Responses API takes typed content items and answers with a list of
//! output items. Only `message` outputs carrying `output_text` are read;
//! reasoning and tool items are skipped.

use std::time::Duration;

use async_trait::async_trait;
use nextcrm_config::DoubaoSettings;
use nextcrm_core::{ChatCompletion, ChatMessage, ChatResponse, ChatRole, LlmError};
use serde::{Deserialize, Serialize};

use crate::http;

const PROVIDER: &str = "doubao";
const RESPONSES_PATH: &str = "responses";

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: ChatRole,
    content: Vec<InputItem<'a>>,
}

#[derive(Debug, Serialize)]
struct InputItem<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for Doubao models behind the Ark Responses API
pub struct DoubaoClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl DoubaoClient {
    pub fn new(settings: &DoubaoSettings, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: http::build_client(PROVIDER, timeout)?,
            url: http::join_url(&settings.base_url, RESPONSES_PATH),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

fn build_request<'a>(model: &'a str, messages: &'a [ChatMessage]) -> ResponsesRequest<'a> {
    ResponsesRequest {
        model,
        input: messages
            .iter()
            .map(|m| InputMessage {
                role: m.role,
                content: vec![InputItem {
                    kind: "input_text",
                    text: &m.content,
                }],
            })
            .collect(),
    }
}

/// Extract the first non-empty output text; none yields zero choices
pub(crate) fn parse_response(body: &str) -> Result<ChatResponse, LlmError> {
    let raw: ResponsesBody = http::decode(PROVIDER, body)?;

    let text = raw
        .output
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content.iter())
        .filter(|c| c.kind == "output_text")
        .filter_map(|c| c.text.as_deref())
        .find(|t| !t.is_empty());

    Ok(match text {
        Some(t) => ChatResponse::from_text(t),
        None => ChatResponse::default(),
    })
}

#[async_trait]
impl ChatCompletion for DoubaoClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let request = build_request(&self.model, messages);

        tracing::debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = messages.len(),
            "Sending responses request"
        );

        let body =
            http::post_json(&self.client, PROVIDER, &self.url, &self.api_key, &request).await?;
        let response = parse_response(&body)?;

        tracing::debug!(provider = PROVIDER, choices = response.choices.len(), "Response received");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_input_text_items() {
        let messages = vec![ChatMessage::system("规则"), ChatMessage::user("张三")];
        let request = build_request("doubao-seed", &messages);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "doubao-seed");
        assert_eq!(json["input"][0]["role"], "system");
        assert_eq!(json["input"][1]["content"][0]["type"], "input_text");
        assert_eq!(json["input"][1]["content"][0]["text"], "张三");
    }

    #[test]
    fn test_parse_skips_reasoning_items() {
        let body = r#"{
            "output": [
                {"type": "reasoning", "content": [{"type": "summary_text", "text": "thinking"}]},
                {"type": "message", "role": "assistant",
                 "content": [{"type": "output_text", "text": "请问您的公司名称是？"}]}
            ]
        }"#;

        let response = parse_response(body).unwrap();
        assert_eq!(response.first_content(), Some("请问您的公司名称是？"));
        assert_eq!(response.choices[0].message.role, ChatRole::Assistant);
    }

    #[test]
    fn test_parse_without_text_yields_no_choices() {
        let response = parse_response(r#"{"output": []}"#).unwrap();
        assert!(response.is_empty());

        let body = r#"{"output": [{"type": "message", "content": [{"type": "output_text", "text": ""}]}]}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(
            parse_response("not json"),
            Err(LlmError::InvalidResponse { .. })
        ));
    }
}
