//! Prompt templates for the customer intake conversation
//!
//! Only the prose lives here. Field names, labels, grouping and the JSON
//! example are generated by the agent crate from its field dictionary, so
//! adding a field never touches these templates.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading prompt overrides
#[derive(Error, Debug)]
pub enum PromptsConfigError {
    #[error("prompts file not found: {0} ({1})")]
    FileNotFound(String, String),

    #[error("failed to parse prompts file: {0}")]
    ParseError(String),
}

/// Intake system prompt prose
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakePrompts {
    /// Opening line describing the assistant's role
    pub intro: String,
    /// Heading for the required-field line
    pub required_heading: String,
    /// Heading for the contact-method line
    pub contact_heading: String,
    /// Heading for the optional-field line
    pub optional_heading: String,
    /// Heading for the workflow list
    pub workflow_heading: String,
    /// Workflow rules, rendered as a numbered list
    pub workflow: Vec<String>,
    /// Sentence introducing the confirmation summary example
    pub summary_intro: String,
    /// Sentence introducing the JSON block example
    pub json_intro: String,
    /// Heading for the JSON rules list
    pub json_rules_heading: String,
    /// Rules describing the JSON block fields
    pub json_rules: Vec<String>,
    /// Heading placed before the already-collected fields
    pub current_fields_heading: String,
    /// Confirmation summary layout
    pub summary: SummaryTemplate,
}

impl Default for IntakePrompts {
    fn default() -> Self {
        Self {
            intro: "你是「新建客户」助手，帮助用户快速完成客户信息录入。".to_string(),
            required_heading: "【必填项】".to_string(),
            contact_heading: "【联系方式至少填一个】".to_string(),
            optional_heading: "【选填项】".to_string(),
            workflow_heading: "【工作流程】".to_string(),
            workflow: vec![
                "用简短友好的中文引导用户，优先收集：必填项和至少一种联系方式".to_string(),
                "用户可能一次性说多条信息（如\"张三，ABC科技公司，微信abc123\"），请准确提取到对应字段".to_string(),
                "尽量在一次对话中收集所有信息（包括选填项），可以主动询问选填项".to_string(),
                "**支持修改和补充**：用户可以说\"把姓名改成李四\"、\"补充一下邮箱是xxx@xxx.com\"、\"电话错了，应该是13900139000\"，请正确更新对应字段".to_string(),
            ],
            summary_intro: "当必填项和至少一种联系方式都收集完成后，生成一份信息总结，格式如下：".to_string(),
            json_intro: "每次回复的最后，附加一个 JSON 块（用于系统处理）：".to_string(),
            json_rules_heading: "【JSON 格式说明】".to_string(),
            json_rules: vec![
                "status: \"collecting\"（收集中）或 \"ready_for_confirmation\"（等待确认）".to_string(),
                "当必填项和至少一种联系方式都收集完成时，status 设为 \"ready_for_confirmation\"".to_string(),
                "只填已确认的字段，未确认的留空字符串 \"\"".to_string(),
                "所有值都必须是字符串".to_string(),
            ],
            current_fields_heading: "【当前已收集的字段】".to_string(),
            summary: SummaryTemplate::default(),
        }
    }
}

impl IntakePrompts {
    /// Load overrides from a YAML file; missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PromptsConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PromptsConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;

        serde_yaml::from_str(&content).map_err(|e| PromptsConfigError::ParseError(e.to_string()))
    }

    /// Load from an optional path, falling back to the built-in texts
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, PromptsConfigError> {
        match path {
            Some(p) => {
                let prompts = Self::load(p)?;
                tracing::info!(path = %p.display(), "Loaded intake prompt overrides");
                Ok(prompts)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Fixed layout of the confirmation summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryTemplate {
    /// Horizontal rule framing the header and closing the field list
    pub rule: String,
    /// Header title line
    pub title: String,
    /// Separator between a label and its value
    pub separator: String,
    /// Closing instruction asking the user to confirm
    pub footer: String,
}

impl Default for SummaryTemplate {
    fn default() -> Self {
        Self {
            rule: "━━━━━━━━━━━━━━━━━━".to_string(),
            title: "📋 客户信息确认".to_string(),
            separator: "：".to_string(),
            footer: "请确认以上信息是否正确？点击「确认创建」按钮即可创建客户。".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_prompts() {
        let prompts = IntakePrompts::default();
        assert!(prompts.intro.contains("新建客户"));
        assert_eq!(prompts.workflow.len(), 4);
        assert_eq!(prompts.summary.separator, "：");
    }

    #[test]
    fn test_partial_yaml_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "intro: You help sales reps register new customers.\nsummary:\n  title: Customer details"
        )
        .unwrap();

        let prompts = IntakePrompts::load(file.path()).unwrap();
        assert_eq!(prompts.intro, "You help sales reps register new customers.");
        assert_eq!(prompts.summary.title, "Customer details");
        // Unspecified keys fall back to defaults
        assert_eq!(prompts.summary.rule, SummaryTemplate::default().rule);
        assert_eq!(prompts.current_fields_heading, "【当前已收集的字段】");
    }

    #[test]
    fn test_missing_file() {
        let result = IntakePrompts::load("/nonexistent/prompts.yaml");
        assert!(matches!(result, Err(PromptsConfigError::FileNotFound(_, _))));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workflow: [unterminated").unwrap();
        assert!(matches!(
            IntakePrompts::load(file.path()),
            Err(PromptsConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let prompts = IntakePrompts::load_or_default(None).unwrap();
        assert_eq!(prompts.intro, IntakePrompts::default().intro);
    }
}
