//! Response splitter
//!
//! A model reply is free prose optionally followed by a fenced JSON block:
//!
//! ````text
//! 好的，已记录张三的信息。
//! ```json
//! {"status": "collecting", "name": "张三", "phone": ""}
//! ```
//! ````
//!
//! Only an untagged fence or one tagged `json` opens the data block. Fences
//! tagged with another language (a `text` summary, say) are skipped whole.
//!
//! Splitting never fails. A missing or unparsable block yields an empty
//! extraction, and the prose before a broken block is still returned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::fields::{FieldKey, FieldSet};

/// Reserved key carrying the model's own status claim
pub const STATUS_KEY: &str = "status";

const FENCE: &str = "```";

/// Fence marker and its language tag, if any
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[ \t]*([A-Za-z0-9_+.-]*)").unwrap());

/// What the splitter found after the prose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// No fence at all; the model is still talking
    Absent,
    /// A fence was found but its interior was not a flat object
    Malformed,
    /// The block parsed
    Parsed,
}

/// Result of splitting one model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResponse {
    /// User-facing text
    pub prose: String,
    /// Known fields with non-empty values
    pub extracted: FieldSet,
    /// The model's status claim, informational only
    pub model_status: Option<String>,
    pub outcome: BlockOutcome,
}

impl SplitResponse {
    fn without_block(prose: &str, outcome: BlockOutcome) -> Self {
        Self {
            prose: prose.trim().to_string(),
            extracted: FieldSet::new(),
            model_status: None,
            outcome,
        }
    }
}

/// Split a raw model reply into prose and extracted fields
pub fn split_response(raw: &str) -> SplitResponse {
    let Some((block_start, interior)) = find_data_block(raw) else {
        return SplitResponse::without_block(raw, BlockOutcome::Absent);
    };
    let prose = &raw[..block_start];

    let Some(interior) = interior else {
        tracing::warn!("Model reply has an unterminated fenced block");
        return SplitResponse::without_block(prose, BlockOutcome::Malformed);
    };

    match parse_block(interior) {
        Ok((extracted, model_status)) => SplitResponse {
            prose: prose.trim().to_string(),
            extracted,
            model_status,
            outcome: BlockOutcome::Parsed,
        },
        Err(reason) => {
            tracing::warn!(reason = %reason, "Ignoring malformed extraction block");
            SplitResponse::without_block(prose, BlockOutcome::Malformed)
        }
    }
}

/// First untagged or `json` fence: its start offset and, when closed, its interior
fn find_data_block(raw: &str) -> Option<(usize, Option<&str>)> {
    let mut pos = 0;
    while let Some(captures) = OPENING_FENCE.captures_at(raw, pos) {
        let Some(marker) = captures.get(0) else {
            break;
        };
        let tag = captures.get(1).map_or("", |m| m.as_str());
        let body_start = marker.end();
        let close = raw[body_start..].find(FENCE).map(|i| body_start + i);

        if tag.is_empty() || tag.eq_ignore_ascii_case("json") {
            return Some((marker.start(), close.map(|end| &raw[body_start..end])));
        }

        tracing::debug!(tag, "Skipping non-data fenced block");
        match close {
            Some(end) => pos = end + FENCE.len(),
            None => break,
        }
    }
    None
}

fn parse_block(interior: &str) -> Result<(FieldSet, Option<String>), String> {
    let object: Map<String, Value> =
        serde_json::from_str(interior.trim()).map_err(|e| e.to_string())?;

    let mut extracted = FieldSet::new();
    let mut model_status = None;

    for (name, value) in &object {
        let text = scalar_text(value).ok_or_else(|| format!("non-scalar value for '{}'", name))?;

        if name.trim().eq_ignore_ascii_case(STATUS_KEY) {
            let text = text.trim();
            model_status = (!text.is_empty()).then(|| text.to_string());
        } else if let Some(key) = FieldKey::parse(name) {
            extracted.set(key, text);
        } else {
            tracing::debug!(key = %name, "Ignoring unknown extracted key");
        }
    }

    Ok((extracted, model_status))
}

/// Text form of a scalar JSON value; `null` reads as empty
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
