//! Create-customer payload built from a completed intake

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{FieldKey, FieldSet};
use super::policy::{is_ready, missing_requirements, Requirement};

/// Source tag recorded on customers created through intake
pub const INTAKE_SOURCE: &str = "ai_intake";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DraftError {
    #[error("intake not complete, missing: {}", join_missing(.0))]
    NotReady(Vec<Requirement>),
}

fn join_missing(missing: &[Requirement]) -> String {
    missing
        .iter()
        .map(Requirement::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Payload for the create-customer capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub position: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub wechat_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub budget: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub intent_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub source: String,
    pub drafted_at: DateTime<Utc>,
}

impl CustomerDraft {
    /// Build a draft; refuses unless the completeness policy is satisfied
    pub fn from_fields(fields: &FieldSet) -> Result<Self, DraftError> {
        if !is_ready(fields) {
            return Err(DraftError::NotReady(missing_requirements(fields)));
        }

        let text = |key: FieldKey| fields.get(key).to_string();
        Ok(Self {
            name: text(FieldKey::Name),
            company: text(FieldKey::Company),
            position: text(FieldKey::Position),
            phone: text(FieldKey::Phone),
            email: text(FieldKey::Email),
            wechat_id: text(FieldKey::WechatId),
            budget: text(FieldKey::Budget),
            intent_level: normalize_intent_level(fields.get(FieldKey::IntentLevel)),
            notes: text(FieldKey::Notes),
            source: INTAKE_SOURCE.to_string(),
            drafted_at: Utc::now(),
        })
    }
}

/// Map free-form intent text onto High/Medium/Low, keeping unknown text as is
pub fn normalize_intent_level(raw: &str) -> String {
    let trimmed = raw.trim();
    let normalized = match trimmed.to_ascii_lowercase().as_str() {
        "high" | "高" | "高意向" => "High",
        "medium" | "mid" | "中" | "中等" | "一般" => "Medium",
        "low" | "低" | "低意向" => "Low",
        _ => return trimmed.to_string(),
    };
    normalized.to_string()
}
