//! Core traits and types for the CRM assistant
//!
//! Holds the provider-agnostic chat completion capability consumed by the
//! intake agent. Concrete providers live in `nextcrm-llm`.

pub mod error;
pub mod llm;

pub use error::{LlmError, Result};
pub use llm::{ChatChoice, ChatCompletion, ChatMessage, ChatResponse, ChatRole};
