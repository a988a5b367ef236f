//! Conversation state held by the terminal driver
//!
//! The agent is stateless; this is the caller side that keeps history and
//! confirmed fields between turns.

use nextcrm_agent::{CustomerDraft, DraftError, FieldSet, TurnResult};
use nextcrm_core::ChatMessage;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Confirm,
    Reset,
    Fields,
    Quit,
    Blank,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => Input::Blank,
            "/quit" | "/exit" => Input::Quit,
            "/reset" => Input::Reset,
            "/fields" => Input::Fields,
            "确认" | "确认创建" => Input::Confirm,
            _ if line.eq_ignore_ascii_case("confirm") => Input::Confirm,
            _ => Input::Message(line.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    history: Vec<ChatMessage>,
    fields: FieldSet,
    ready: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn turns(&self) -> usize {
        self.history.len()
    }

    /// History as it would be sent with `text` as the next user message
    pub fn history_with(&self, text: &str) -> Vec<ChatMessage> {
        let mut history = self.history.clone();
        history.push(ChatMessage::user(text));
        history
    }

    /// Record a successful turn
    pub fn apply(&mut self, text: &str, result: &TurnResult) {
        self.history.push(ChatMessage::user(text));
        self.history.push(ChatMessage::assistant(result.reply.clone()));
        self.fields = result.fields.clone();
        self.ready = result.ready;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn draft(&self) -> Result<CustomerDraft, DraftError> {
        CustomerDraft::from_fields(&self.fields)
    }
}
