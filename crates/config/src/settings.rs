//! Runtime settings
//!
//! Layered with the `config` crate, lowest priority first:
//! 1. serde defaults
//! 2. YAML file (`config/nextcrm.yaml` unless a path is given)
//! 3. `NEXTCRM_<SECTION>__<KEY>` environment variables
//! 4. flat provider variables (`DOUBAO_API_KEY`, `DEEPSEEK_MODEL`, ...)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{endpoints, env, generation, models, timeouts, DEFAULT_CONFIG_FILE};

/// Settings errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub intake: IntakeSettings,
    pub logging: LoggingSettings,
}

/// Chat provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Request timeout applied by the HTTP client
    pub timeout_secs: u64,
    pub doubao: DoubaoSettings,
    pub deepseek: DeepSeekSettings,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            timeout_secs: timeouts::LLM_REQUEST_SECS,
            doubao: DoubaoSettings::default(),
            deepseek: DeepSeekSettings::default(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Doubao (Volcengine Ark Responses API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubaoSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for DoubaoSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: endpoints::DOUBAO_DEFAULT.to_string(),
            model: models::DOUBAO_DEFAULT.to_string(),
        }
    }
}

impl DoubaoSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// DeepSeek (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepSeekSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for DeepSeekSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: endpoints::DEEPSEEK_DEFAULT.to_string(),
            model: models::DEEPSEEK_DEFAULT.to_string(),
            temperature: generation::DEFAULT_TEMPERATURE,
            max_tokens: generation::DEFAULT_MAX_TOKENS,
        }
    }
}

impl DeepSeekSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Intake conversation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeSettings {
    /// Optional YAML file overriding the built-in prompt texts
    pub prompts_path: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Flat variable → settings key
const FLAT_OVERRIDES: &[(&str, &str)] = &[
    (env::DOUBAO_API_KEY, "llm.doubao.api_key"),
    (env::DOUBAO_BASE_URL, "llm.doubao.base_url"),
    (env::DOUBAO_MODEL, "llm.doubao.model"),
    (env::DEEPSEEK_API_KEY, "llm.deepseek.api_key"),
    (env::DEEPSEEK_BASE_URL, "llm.deepseek.base_url"),
    (env::DEEPSEEK_MODEL, "llm.deepseek.model"),
];

impl Settings {
    /// Load settings from the process environment and an optional file
    ///
    /// With `path = None` the default file is read if it exists. An explicit
    /// path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, None, |key| std::env::var(key).ok())
    }

    /// Load with an explicit environment, used by tests
    ///
    /// `structured_env` replaces the process environment for `NEXTCRM_*`
    /// variables when given; `flat_env` resolves the flat provider variables.
    pub fn load_with<F>(
        path: Option<&Path>,
        structured_env: Option<HashMap<String, String>>,
        flat_env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(env::PREFIX)
                .prefix_separator("_")
                .separator(env::SEPARATOR)
                .source(structured_env),
        );

        for (var, key) in FLAT_OVERRIDES {
            let value = flat_env(*var).filter(|v| !v.trim().is_empty());
            if value.is_some() {
                tracing::debug!(variable = *var, key = *key, "Applying flat environment override");
            }
            builder = builder.set_override_option(*key, value)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no provider could work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "llm.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.deepseek.temperature) {
            return Err(ConfigError::Invalid {
                key: "llm.deepseek.temperature".to_string(),
                reason: format!("{} is outside 0.0..=2.0", self.llm.deepseek.temperature),
            });
        }
        if self.llm.deepseek.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                key: "llm.deepseek.max_tokens".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_flat(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with(None, Some(HashMap::new()), no_flat).unwrap();
        assert_eq!(settings.llm.timeout_secs, 60);
        assert_eq!(settings.llm.doubao.base_url, endpoints::DOUBAO_DEFAULT);
        assert_eq!(settings.llm.deepseek.model, "deepseek-chat");
        assert!(!settings.llm.doubao.is_configured());
        assert_eq!(settings.logging.level, "info");
        assert!(settings.intake.prompts_path.is_none());
    }

    #[test]
    fn test_yaml_file_layer() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "llm:\n  timeout_secs: 15\n  deepseek:\n    api_key: sk-file\n    temperature: 0.2\nlogging:\n  json: true"
        )
        .unwrap();

        let settings =
            Settings::load_with(Some(file.path()), Some(HashMap::new()), no_flat).unwrap();
        assert_eq!(settings.llm.timeout_secs, 15);
        assert_eq!(settings.llm.deepseek.api_key, "sk-file");
        assert!((settings.llm.deepseek.temperature - 0.2).abs() < f32::EPSILON);
        // Untouched keys keep their defaults
        assert_eq!(settings.llm.deepseek.max_tokens, 2000);
        assert!(settings.logging.json);
    }

    #[test]
    fn test_shipped_example_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/nextcrm.example.yaml");
        let settings =
            Settings::load_with(Some(path.as_path()), Some(HashMap::new()), no_flat).unwrap();
        assert_eq!(settings.llm.doubao.model, models::DOUBAO_DEFAULT);
        assert!(!settings.llm.deepseek.is_configured());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load_with(
            Some(Path::new("/nonexistent/nextcrm.yaml")),
            Some(HashMap::new()),
            no_flat,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_structured_env_layer() {
        let mut env_map = HashMap::new();
        env_map.insert("NEXTCRM_LLM__TIMEOUT_SECS".to_string(), "30".to_string());
        env_map.insert("NEXTCRM_LOGGING__LEVEL".to_string(), "debug".to_string());

        let settings = Settings::load_with(None, Some(env_map), no_flat).unwrap();
        assert_eq!(settings.llm.timeout_secs, 30);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_flat_env_overrides_win() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "NEXTCRM_LLM__DOUBAO__API_KEY".to_string(),
            "structured".to_string(),
        );

        let settings = Settings::load_with(None, Some(env_map), |key| match key {
            "DOUBAO_API_KEY" => Some("flat".to_string()),
            "DEEPSEEK_MODEL" => Some("deepseek-reasoner".to_string()),
            "DEEPSEEK_API_KEY" => Some("   ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.llm.doubao.api_key, "flat");
        assert_eq!(settings.llm.deepseek.model, "deepseek-reasoner");
        // Blank values are ignored
        assert!(!settings.llm.deepseek.is_configured());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.llm.timeout_secs = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { ref key, .. }) if key == "llm.timeout_secs"
        ));
    }

    #[test]
    fn test_validate_rejects_temperature() {
        let mut settings = Settings::default();
        settings.llm.deepseek.temperature = 3.5;
        assert!(settings.validate().is_err());
    }
}
