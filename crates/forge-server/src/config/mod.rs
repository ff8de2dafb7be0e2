// crates/forge-server/src/config/mod.rs
// Configuration and settings resolution

pub mod env;
pub mod file;

pub use env::{API_KEY_VARS, ApiKeys, ConfigValidation, EnvConfig};
pub use file::ForgeConfig;

use crate::chat::FailurePolicy;
use crate::llm::{DEFAULT_MODEL, GEMINI_API_BASE};

/// Effective settings after layering CLI flags, env and config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: Option<f32>,
    pub failure_policy: FailurePolicy,
}

impl Settings {
    /// Precedence: CLI flag > env > config file > built-in default
    pub fn resolve(cli_model: Option<String>, env: &EnvConfig, file: &ForgeConfig) -> Self {
        Self {
            api_key: env.api_keys.gemini_or_empty(),
            model: cli_model
                .or_else(|| env.model.clone())
                .or_else(|| file.llm.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: env
                .api_base
                .clone()
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            temperature: file.llm.temperature,
            failure_policy: env
                .parsed_failure_policy()
                .or_else(|| file.failure_policy())
                .unwrap_or_default(),
        }
    }
}
