//! Customer intake agent
//!
//! Drives a multi-turn conversation that collects customer fields through an
//! untrusted language model. The model proposes; the backend decides:
//! extracted fields are merged monotonically and readiness is always
//! recomputed from the merged set, whatever status the model claims.

pub mod dto;
pub mod error;
pub mod intake;

pub use dto::{IntakeChatRequest, IntakeChatResponse, RequestError};
pub use error::IntakeError;
pub use intake::{
    customer::{CustomerDraft, DraftError},
    extractor::{split_response, BlockOutcome, SplitResponse},
    fields::{FieldClass, FieldKey, FieldSet, FieldSpec},
    merge::merge_fields,
    policy::{is_ready, missing_requirements, IntakeStatus, Requirement},
    summary::render_summary,
    IntakeAgent, TurnResult,
};
