//! System instruction builder
//!
//! Prose comes from `IntakePrompts`; every field-specific line (groups,
//! example summary, example JSON, current fields) is generated from the
//! field dictionary.

use nextcrm_config::IntakePrompts;

use super::extractor::STATUS_KEY;
use super::fields::{FieldClass, FieldKey, FieldSet};
use super::policy::IntakeStatus;
use super::summary::render_summary;

/// Build the system instruction for one turn
pub fn build_system_prompt(prompts: &IntakePrompts, confirmed: &FieldSet) -> String {
    let mut out = String::new();

    out.push_str(&prompts.intro);
    out.push_str("\n\n");

    out.push_str(&prompts.required_heading);
    out.push_str(&field_group(FieldClass::Required));
    out.push('\n');
    out.push_str(&prompts.contact_heading);
    out.push_str(&field_group(FieldClass::Contact));
    out.push('\n');
    out.push_str(&prompts.optional_heading);
    out.push_str(&field_group(FieldClass::Optional));
    out.push_str("\n\n");

    out.push_str(&prompts.workflow_heading);
    out.push('\n');
    let mut step = 0;
    for rule in &prompts.workflow {
        step += 1;
        out.push_str(&format!("{}. {}\n", step, rule));
    }

    step += 1;
    out.push_str(&format!("{}. {}\n\n", step, prompts.summary_intro));
    out.push_str(&render_summary(&example_fields(), &prompts.summary));
    out.push_str("\n\n");

    step += 1;
    out.push_str(&format!("{}. {}\n", step, prompts.json_intro));
    out.push_str("```json\n");
    out.push_str(&example_block());
    out.push_str("\n```\n\n");

    out.push_str(&prompts.json_rules_heading);
    out.push('\n');
    for rule in &prompts.json_rules {
        out.push_str(&format!("- {}\n", rule));
    }

    out.push('\n');
    out.push_str(&prompts.current_fields_heading);
    out.push('\n');
    out.push_str(&current_fields_json(confirmed));

    out
}

/// `姓名(name)、公司(company)` style listing of one class
fn field_group(class: FieldClass) -> String {
    FieldKey::of_class(class)
        .map(|key| {
            let spec = key.spec();
            match spec.description {
                Some(desc) => format!("{}({}: {})", spec.label, key.as_str(), desc),
                None => format!("{}({})", spec.label, key.as_str()),
            }
        })
        .collect::<Vec<_>>()
        .join("、")
}

fn example_fields() -> FieldSet {
    FieldKey::ALL
        .iter()
        .fold(FieldSet::new(), |fields, key| fields.with(*key, key.spec().example))
}

fn example_block() -> String {
    let status = (STATUS_KEY, IntakeStatus::ReadyForConfirmation.as_str());
    let fields = FieldKey::ALL
        .iter()
        .map(|key| (key.as_str(), key.spec().example));
    json_object(std::iter::once(status).chain(fields))
}

/// Every dictionary key, unset ones as `""`
fn current_fields_json(confirmed: &FieldSet) -> String {
    json_object(FieldKey::ALL.iter().map(|key| (key.as_str(), confirmed.get(*key))))
}

/// Flat JSON object preserving the given key order
fn json_object<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let body = pairs
        .map(|(k, v)| format!("{}:{}", quote(k), quote(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", body)
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
