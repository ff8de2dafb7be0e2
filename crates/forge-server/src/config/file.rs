// crates/forge-server/src/config/file.rs
// File-based configuration from ~/.forge/config.toml

use crate::chat::FailurePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default)]
pub struct ForgeConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// LLM configuration section
#[derive(Debug, Deserialize, Default)]
pub struct LlmConfig {
    /// Gemini model name
    pub model: Option<String>,
    /// Sampling temperature for both operations
    pub temperature: Option<f32>,
}

/// Chat configuration section
#[derive(Debug, Deserialize, Default)]
pub struct ChatConfig {
    /// "keep_user_turn" or "drop_failed_turn"
    pub failure_policy: Option<String>,
}

impl ForgeConfig {
    /// Load config from ~/.forge/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; missing or invalid files yield defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Directory holding config.toml and .env
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".forge")
    }

    /// Get the config file path
    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn failure_policy(&self) -> Option<FailurePolicy> {
        self.chat
            .failure_policy
            .as_deref()
            .and_then(FailurePolicy::parse)
    }
}
