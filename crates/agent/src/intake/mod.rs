//! Customer intake conversation
//!
//! `IntakeAgent` runs one stateless turn: build the system instruction,
//! call the chat capability once, split the reply, merge fields, and decide
//! readiness with the backend policy. History and confirmed fields come
//! from the caller every turn and nothing is retained between turns, so
//! concurrent turns need no locking.
//!
//! On failure no fields are merged; the caller resubmits the same turn.

pub mod customer;
pub mod extractor;
pub mod fields;
pub mod merge;
pub mod policy;
pub mod prompt;
pub mod summary;

use std::sync::Arc;

use nextcrm_config::IntakePrompts;
use nextcrm_core::{ChatCompletion, ChatMessage, ChatRole};
use tokio_util::sync::CancellationToken;

use crate::error::IntakeError;
use extractor::split_response;
use fields::FieldSet;
use merge::merge_fields;
use policy::{is_ready, missing_requirements, IntakeStatus, Requirement};
use summary::render_summary;

/// Outcome of one successful turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// User-facing prose with the data block removed
    pub reply: String,
    /// Confirmed fields merged with this turn's extraction
    pub fields: FieldSet,
    /// Backend readiness decision
    pub ready: bool,
    /// Confirmation block, present iff `ready`
    pub summary: Option<String>,
}

impl TurnResult {
    pub fn status(&self) -> IntakeStatus {
        IntakeStatus::from_ready(self.ready)
    }

    /// Requirements still unmet by the merged fields
    pub fn missing(&self) -> Vec<Requirement> {
        missing_requirements(&self.fields)
    }
}

/// Stateless intake conversation driver
pub struct IntakeAgent {
    chat: Arc<dyn ChatCompletion>,
    prompts: IntakePrompts,
}

impl IntakeAgent {
    /// Create an agent with the built-in prompt texts
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self::with_prompts(chat, IntakePrompts::default())
    }

    pub fn with_prompts(chat: Arc<dyn ChatCompletion>, prompts: IntakePrompts) -> Self {
        Self { chat, prompts }
    }

    /// Fresh system instruction followed by the history, minus any system messages
    pub fn build_messages(
        &self,
        history: &[ChatMessage],
        confirmed: &FieldSet,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(prompt::build_system_prompt(
            &self.prompts,
            confirmed,
        )));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != ChatRole::System)
                .cloned(),
        );
        messages
    }

    /// Run one turn
    pub async fn handle_turn(
        &self,
        history: &[ChatMessage],
        confirmed: &FieldSet,
    ) -> Result<TurnResult, IntakeError> {
        let messages = self.build_messages(history, confirmed);

        tracing::debug!(
            provider = self.chat.provider(),
            messages = messages.len(),
            confirmed = confirmed.len(),
            "Requesting intake completion"
        );

        let response = self.chat.complete(&messages).await.map_err(|e| {
            tracing::warn!(
                provider = self.chat.provider(),
                transient = e.is_transient(),
                error = %e,
                "Intake completion failed"
            );
            IntakeError::ModelUnavailable(e)
        })?;

        let content = match response.first_content() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::warn!(
                    provider = self.chat.provider(),
                    choices = response.choices.len(),
                    "Intake completion had no content"
                );
                return Err(IntakeError::EmptyModelResponse);
            }
        };

        Ok(self.process_reply(content, confirmed))
    }

    /// Run one turn, abandoning the model call if `cancel` fires first
    pub async fn handle_turn_cancellable(
        &self,
        history: &[ChatMessage],
        confirmed: &FieldSet,
        cancel: &CancellationToken,
    ) -> Result<TurnResult, IntakeError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("Intake turn cancelled");
                Err(IntakeError::Cancelled)
            }
            result = self.handle_turn(history, confirmed) => result,
        }
    }

    /// Split, merge and decide readiness for a raw model reply
    pub fn process_reply(&self, raw: &str, confirmed: &FieldSet) -> TurnResult {
        let split = split_response(raw);
        let fields = merge_fields(confirmed, &split.extracted);
        let ready = is_ready(&fields);

        if let Some(hint) = split.model_status.as_deref() {
            let claimed = IntakeStatus::parse_hint(hint);
            if claimed != Some(IntakeStatus::from_ready(ready)) {
                tracing::warn!(
                    model_status = hint,
                    ready,
                    "Model status disagrees with completeness policy"
                );
            }
        }

        let summary = ready.then(|| render_summary(&fields, &self.prompts.summary));

        tracing::debug!(
            block = ?split.outcome,
            extracted = split.extracted.len(),
            filled = fields.len(),
            ready,
            missing = ?missing_requirements(&fields),
            "Intake turn processed"
        );

        TurnResult {
            reply: split.prose,
            fields,
            ready,
            summary,
        }
    }
}
