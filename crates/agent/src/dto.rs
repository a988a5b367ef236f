//! Wire types for the intake chat endpoint

use nextcrm_core::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intake::fields::FieldSet;
use crate::intake::policy::IntakeStatus;
use crate::intake::TurnResult;

/// Caller-side request validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("conversation history is empty")]
    EmptyHistory,

    #[error("conversation history has no user message")]
    NoUserMessage,
}

/// One intake turn as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Fields confirmed in earlier turns; empty on the first turn
    #[serde(default)]
    pub current_fields: FieldSet,
}

impl IntakeChatRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.messages.is_empty() {
            return Err(RequestError::EmptyHistory);
        }
        if !self.messages.iter().any(|m| m.role == ChatRole::User) {
            return Err(RequestError::NoUserMessage);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeChatResponse {
    pub reply: String,
    pub extracted_fields: FieldSet,
    pub status: IntakeStatus,
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Unmet requirements, e.g. `company` or `contact`
    #[serde(default)]
    pub missing_fields: Vec<String>,
}

impl From<TurnResult> for IntakeChatResponse {
    fn from(turn: TurnResult) -> Self {
        let missing_fields = turn
            .missing()
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        Self {
            status: turn.status(),
            ready: turn.ready,
            reply: turn.reply,
            extracted_fields: turn.fields,
            summary: turn.summary,
            missing_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::fields::FieldKey;

    #[test]
    fn test_request_from_json() {
        let request: IntakeChatRequest = serde_json::from_str(
            r#"{
                "messages": [
                    {"role": "assistant", "content": "您好，请问客户叫什么？"},
                    {"role": "user", "content": "张三"}
                ],
                "current_fields": {"name": "", "company": "ABC", "unknown": "x"}
            }"#,
        )
        .unwrap();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.current_fields.len(), 1);
        assert_eq!(request.current_fields.get(FieldKey::Company), "ABC");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_current_fields_optional() {
        let request: IntakeChatRequest =
            serde_json::from_str(r#"{"messages": [{"role": "user", "content": "hi"}]}"#).unwrap();
        assert!(request.current_fields.is_empty());
    }

    #[test]
    fn test_validate() {
        let empty = IntakeChatRequest {
            messages: vec![],
            current_fields: FieldSet::new(),
        };
        assert_eq!(empty.validate(), Err(RequestError::EmptyHistory));

        let assistant_only = IntakeChatRequest {
            messages: vec![ChatMessage::assistant("您好")],
            current_fields: FieldSet::new(),
        };
        assert_eq!(assistant_only.validate(), Err(RequestError::NoUserMessage));
    }

    #[test]
    fn test_response_from_turn() {
        let turn = TurnResult {
            reply: "请问联系方式？".to_string(),
            fields: FieldSet::new()
                .with(FieldKey::Name, "张三")
                .with(FieldKey::Company, "ABC"),
            ready: false,
            summary: None,
        };
        let json = serde_json::to_value(IntakeChatResponse::from(turn)).unwrap();

        assert_eq!(json["status"], "collecting");
        assert_eq!(json["ready"], false);
        assert_eq!(json["extracted_fields"]["name"], "张三");
        assert_eq!(json["missing_fields"], serde_json::json!(["contact"]));
        assert!(json.get("summary").is_none());
    }
}
