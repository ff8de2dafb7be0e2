// crates/forge-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use crate::chat::FailurePolicy;
use tracing::{debug, info, warn};

/// Env vars checked for the Gemini credential, in priority order
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini key (GEMINI_API_KEY, GOOGLE_API_KEY or API_KEY)
    pub gemini: Option<String>,
}

impl ApiKeys {
    /// Load API keys from environment variables
    pub fn from_env() -> Self {
        let gemini = API_KEY_VARS.iter().find_map(|name| Self::read_key(name));
        let keys = Self { gemini };
        keys.log_status();
        keys
    }

    /// Read a single API key from environment, filtering empty values
    fn read_key(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|k| !k.trim().is_empty())
    }

    fn log_status(&self) {
        if self.gemini.is_some() {
            debug!("Gemini API key loaded");
        } else {
            warn!("No Gemini API key configured - generation will fail");
        }
    }

    pub fn has_llm_provider(&self) -> bool {
        self.gemini.is_some()
    }

    /// Key to hand to the client; empty when unset so the first call fails
    pub fn gemini_or_empty(&self) -> String {
        self.gemini.clone().unwrap_or_default()
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    /// Model override (FORGE_MODEL)
    pub model: Option<String>,
    /// API base override (FORGE_API_BASE)
    pub api_base: Option<String>,
    /// Web server port (FORGE_WEB_PORT)
    pub web_port: Option<u16>,
    /// Raw failure policy value (FORGE_FAILURE_POLICY)
    pub failure_policy: Option<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");

        Self {
            api_keys: ApiKeys::from_env(),
            model: non_empty_env("FORGE_MODEL"),
            api_base: non_empty_env("FORGE_API_BASE"),
            web_port: non_empty_env("FORGE_WEB_PORT").and_then(|p| p.parse().ok()),
            failure_policy: non_empty_env("FORGE_FAILURE_POLICY"),
        }
    }

    /// Parsed failure policy, if the env var holds a known value
    pub fn parsed_failure_policy(&self) -> Option<FailurePolicy> {
        self.failure_policy.as_deref().and_then(FailurePolicy::parse)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if !self.api_keys.has_llm_provider() {
            validation.add_warning(format!(
                "No Gemini API key configured. Set one of {}.",
                API_KEY_VARS.join(", ")
            ));
        }

        if let Some(ref policy) = self.failure_policy
            && FailurePolicy::parse(policy).is_none()
        {
            validation.add_warning(format!(
                "Unknown FORGE_FAILURE_POLICY '{}'. Valid options: keep_user_turn, drop_failed_turn",
                policy
            ));
        }

        if let Some(ref base) = self.api_base
            && !(base.starts_with("http://") || base.starts_with("https://"))
        {
            validation.add_error(format!("FORGE_API_BASE must be an http(s) URL, got '{}'", base));
        }

        validation
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}
