//! Centralized constants
//!
//! Single source of truth for provider endpoints and default values so the
//! settings defaults and the clients never drift apart.

/// Provider endpoints
pub mod endpoints {
    /// Doubao (Volcengine Ark) base URL
    pub const DOUBAO_DEFAULT: &str = "https://ark.cn-beijing.volces.com/api/v3";

    /// DeepSeek base URL (OpenAI-compatible)
    pub const DEEPSEEK_DEFAULT: &str = "https://api.deepseek.com";
}

/// Model identifiers
pub mod models {
    pub const DOUBAO_DEFAULT: &str = "doubao-seed-1-8-251228";
    pub const DEEPSEEK_DEFAULT: &str = "deepseek-chat";
}

/// Completion parameters
pub mod generation {
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;
}

/// Timeouts
pub mod timeouts {
    /// Per-request timeout for chat providers (seconds)
    pub const LLM_REQUEST_SECS: u64 = 60;
}

/// Environment variable conventions
pub mod env {
    /// Prefix for structured overrides, e.g. `NEXTCRM_LLM__TIMEOUT_SECS`
    pub const PREFIX: &str = "NEXTCRM";

    /// Separator between nested keys
    pub const SEPARATOR: &str = "__";

    /// Flat provider variables honoured for compatibility with existing deployments
    pub const DOUBAO_API_KEY: &str = "DOUBAO_API_KEY";
    pub const DOUBAO_BASE_URL: &str = "DOUBAO_BASE_URL";
    pub const DOUBAO_MODEL: &str = "DOUBAO_MODEL";
    pub const DEEPSEEK_API_KEY: &str = "DEEPSEEK_API_KEY";
    pub const DEEPSEEK_BASE_URL: &str = "DEEPSEEK_BASE_URL";
    pub const DEEPSEEK_MODEL: &str = "DEEPSEEK_MODEL";
}

/// Default location of the optional settings file
pub const DEFAULT_CONFIG_FILE: &str = "config/nextcrm.yaml";
