//! Completeness policy
//!
//! The single authority on whether a customer can be created. Evaluated
//! fresh from the merged fields every turn; the model's status claim is
//! never consulted.

use serde::{Deserialize, Serialize};

use super::fields::{FieldClass, FieldKey, FieldSet};

/// One unmet readiness condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A required field is empty
    Field(FieldKey),
    /// Every contact field is empty
    AnyContact,
}

impl Requirement {
    /// Stable name used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Requirement::Field(key) => key.as_str(),
            Requirement::AnyContact => "contact",
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All required fields filled and at least one contact field filled
pub fn is_ready(fields: &FieldSet) -> bool {
    FieldKey::of_class(FieldClass::Required).all(|key| fields.is_filled(key))
        && FieldKey::of_class(FieldClass::Contact).any(|key| fields.is_filled(key))
}

/// Unmet requirements, required fields first in dictionary order
pub fn missing_requirements(fields: &FieldSet) -> Vec<Requirement> {
    let mut missing: Vec<Requirement> = FieldKey::of_class(FieldClass::Required)
        .filter(|key| !fields.is_filled(*key))
        .map(Requirement::Field)
        .collect();

    if !FieldKey::of_class(FieldClass::Contact).any(|key| fields.is_filled(key)) {
        missing.push(Requirement::AnyContact);
    }
    missing
}

/// Conversation status reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStatus {
    Collecting,
    ReadyForConfirmation,
}

impl IntakeStatus {
    pub fn from_ready(ready: bool) -> Self {
        if ready {
            IntakeStatus::ReadyForConfirmation
        } else {
            IntakeStatus::Collecting
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::Collecting => "collecting",
            IntakeStatus::ReadyForConfirmation => "ready_for_confirmation",
        }
    }

    /// Interpret a model's status claim; unrecognised text yields `None`
    pub fn parse_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "collecting" => Some(IntakeStatus::Collecting),
            "ready_for_confirmation" | "ready" => Some(IntakeStatus::ReadyForConfirmation),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let fields = FieldSet::new();
        assert!(!is_ready(&fields));
        assert_eq!(
            missing_requirements(&fields),
            vec![
                Requirement::Field(FieldKey::Name),
                Requirement::Field(FieldKey::Company),
                Requirement::AnyContact,
            ]
        );
    }

    #[test]
    fn test_each_contact_field_suffices() {
        for contact in [FieldKey::Phone, FieldKey::Email, FieldKey::WechatId] {
            let fields = FieldSet::new()
                .with(FieldKey::Name, "张三")
                .with(FieldKey::Company, "ABC")
                .with(contact, "x");
            assert!(is_ready(&fields), "{} should satisfy contact", contact);
            assert!(missing_requirements(&fields).is_empty());
        }
    }

    #[test]
    fn test_optional_fields_never_suffice() {
        let fields = FieldSet::new()
            .with(FieldKey::Name, "张三")
            .with(FieldKey::Company, "ABC")
            .with(FieldKey::Position, "CTO")
            .with(FieldKey::Budget, "50万")
            .with(FieldKey::IntentLevel, "High")
            .with(FieldKey::Notes, "n");
        assert!(!is_ready(&fields));
        assert_eq!(missing_requirements(&fields), vec![Requirement::AnyContact]);
    }

    #[test]
    fn test_missing_required() {
        let fields = FieldSet::new()
            .with(FieldKey::Name, "张三")
            .with(FieldKey::Phone, "138");
        assert!(!is_ready(&fields));
        assert_eq!(
            missing_requirements(&fields),
            vec![Requirement::Field(FieldKey::Company)]
        );
    }

    #[test]
    fn test_status_hint() {
        assert_eq!(
            IntakeStatus::parse_hint(" Ready_For_Confirmation "),
            Some(IntakeStatus::ReadyForConfirmation)
        );
        assert_eq!(IntakeStatus::parse_hint("collecting"), Some(IntakeStatus::Collecting));
        assert_eq!(IntakeStatus::parse_hint("done?"), None);
        assert_eq!(IntakeStatus::from_ready(true).as_str(), "ready_for_confirmation");
        assert_eq!(
            serde_json::to_string(&IntakeStatus::Collecting).unwrap(),
            "\"collecting\""
        );
    }
}
