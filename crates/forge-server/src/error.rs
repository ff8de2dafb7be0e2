// crates/forge-server/src/error.rs
// Standardized error types for Persona Forge

use thiserror::Error;

/// Why a persona synthesis attempt failed (logged, never shown to the user)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisCause {
    /// The generation call itself errored (network, auth, quota)
    Request,
    /// The call succeeded but returned no text
    EmptyResponse,
    /// The text did not parse as the persona schema
    MalformedResponse,
}

impl SynthesisCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisCause::Request => "request",
            SynthesisCause::EmptyResponse => "empty_response",
            SynthesisCause::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for SynthesisCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the forge library
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation already in progress")]
    Busy,

    #[error("no persona generated yet")]
    NoPersona,

    #[error("persona synthesis failed ({cause}): {detail}")]
    Synthesis {
        cause: SynthesisCause,
        detail: String,
    },

    #[error("chat relay failed: {0}")]
    Relay(String),
}

/// Convenience type alias for Result using ForgeError
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Banner shown near the form when synthesis fails, whatever the cause
pub const SYNTHESIS_FAILED_MESSAGE: &str =
    "Failed to generate persona. Please ensure API Key is valid.";

impl ForgeError {
    pub fn synthesis(cause: SynthesisCause, detail: impl Into<String>) -> Self {
        ForgeError::Synthesis {
            cause,
            detail: detail.into(),
        }
    }

    /// Convert to user-facing string for API and CLI boundaries
    ///
    /// Synthesis failures collapse to one generic banner.
    pub fn to_user_string(&self) -> String {
        match self {
            ForgeError::Synthesis { .. } => SYNTHESIS_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_synthesis(&self) -> bool {
        matches!(self, ForgeError::Synthesis { .. })
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, ForgeError::Relay(_))
    }
}
