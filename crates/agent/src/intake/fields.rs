//! Customer field dictionary and field set
//!
//! `FieldKey::spec` is the only place a field is declared. The prompt
//! builder, splitter, merger, policy and summary renderer all iterate
//! `FieldKey::ALL`, so a new field is one enum variant plus one match arm.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Known customer fields, in summary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    Company,
    Position,
    Phone,
    Email,
    WechatId,
    Budget,
    IntentLevel,
    Notes,
}

/// How a field participates in readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Must be non-empty
    Required,
    /// At least one field of this class must be non-empty
    Contact,
    /// Never blocks readiness
    Optional,
}

/// Static description of one field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Display label used in prompts and summaries
    pub label: &'static str,
    pub class: FieldClass,
    /// Extra guidance for the model, e.g. accepted values
    pub description: Option<&'static str>,
    /// Sample value used in the prompt examples
    pub example: &'static str,
}

impl FieldKey {
    pub const ALL: [FieldKey; 9] = [
        FieldKey::Name,
        FieldKey::Company,
        FieldKey::Position,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::WechatId,
        FieldKey::Budget,
        FieldKey::IntentLevel,
        FieldKey::Notes,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Company => "company",
            FieldKey::Position => "position",
            FieldKey::Phone => "phone",
            FieldKey::Email => "email",
            FieldKey::WechatId => "wechat_id",
            FieldKey::Budget => "budget",
            FieldKey::IntentLevel => "intent_level",
            FieldKey::Notes => "notes",
        }
    }

    /// Parse a wire name, case-insensitively; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
    }

    pub fn spec(&self) -> FieldSpec {
        let (label, class, description, example) = match self {
            FieldKey::Name => ("姓名", FieldClass::Required, None, "张三"),
            FieldKey::Company => ("公司", FieldClass::Required, None, "ABC科技有限公司"),
            FieldKey::Position => ("职位", FieldClass::Optional, None, "技术总监"),
            FieldKey::Phone => ("电话", FieldClass::Contact, None, "13800138000"),
            FieldKey::Email => ("邮箱", FieldClass::Contact, None, "zhangsan@abc.com"),
            FieldKey::WechatId => ("微信号", FieldClass::Contact, None, "zhangsan_wx"),
            FieldKey::Budget => ("预算", FieldClass::Optional, None, "50万"),
            FieldKey::IntentLevel => (
                "意向等级",
                FieldClass::Optional,
                Some("High/Medium/Low"),
                "High",
            ),
            FieldKey::Notes => ("备注", FieldClass::Optional, None, "对CRM系统感兴趣"),
        };
        FieldSpec {
            label,
            class,
            description,
            example,
        }
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    pub fn class(&self) -> FieldClass {
        self.spec().class
    }

    /// Keys of one class, in dictionary order
    pub fn of_class(class: FieldClass) -> impl Iterator<Item = FieldKey> {
        Self::ALL.into_iter().filter(move |key| key.class() == class)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collected customer fields
///
/// Only trimmed, non-empty values are stored. Reading an unset field gives
/// `""`, so "never mentioned" and "empty" are the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<FieldKey, String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, `""` when unset
    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn is_filled(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Set a field; blank values unset it
    pub fn set(&mut self, key: FieldKey, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value.to_string());
        }
    }

    pub fn with(mut self, key: FieldKey, value: impl AsRef<str>) -> Self {
        self.set(key, value);
        self
    }

    /// Filled fields in dictionary order
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from loosely typed pairs, dropping unknown keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fields = Self::new();
        for (name, value) in pairs {
            if let Some(key) = FieldKey::parse(name.as_ref()) {
                fields.set(key, value);
            }
        }
        fields
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(Self::from_pairs(
            raw.into_iter().map(|(k, v)| (k, v.unwrap_or_default())),
        ))
    }
}
