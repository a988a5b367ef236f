//! Configuration for the CRM assistant
//!
//! - `settings`: layered runtime settings (defaults, YAML file, environment)
//! - `prompts`: intake system-prompt prose and the confirmation summary layout
//! - `constants`: provider endpoints and default values

pub mod constants;
pub mod prompts;
pub mod settings;

pub use prompts::{IntakePrompts, PromptsConfigError, SummaryTemplate};
pub use settings::{
    ConfigError, DeepSeekSettings, DoubaoSettings, IntakeSettings, LlmSettings, LoggingSettings,
    Settings,
};
