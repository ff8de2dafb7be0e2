// crates/forge-types/src/lib.rs
// Shared types for Persona Forge (native + WASM compatible)
// No native-only dependencies allowed here

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════
// PERSONA TYPES
// ═══════════════════════════════════════

/// User input for persona synthesis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaFormData {
    pub name: String,
    pub vibe: String,
    pub purpose: String,
}

impl PersonaFormData {
    pub fn new(
        name: impl Into<String>,
        vibe: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vibe: vibe.into(),
            purpose: purpose.into(),
        }
    }

    /// Name of the first empty (or whitespace-only) field, if any
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("vibe", &self.vibe),
            ("purpose", &self.purpose),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing_field().is_none()
    }
}

/// Persona bundle returned by the generation service
///
/// Field names match the JSON schema sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPersona {
    /// Directive that conditions the model for a whole chat session
    pub system_instruction: String,
    /// Text for BotFather's /setdescription (shown before /start)
    pub bot_father_description: String,
    /// Text for BotFather's /setabouttext (profile page)
    pub bot_father_about: String,
    /// First message the bot sends on /start
    pub welcome_message: String,
    /// Newline-separated "command - description" lines
    pub bot_commands: String,
}

/// One parsed line of a persona's command list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

// ═══════════════════════════════════════
// CHAT TYPES
// ═══════════════════════════════════════

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-visible chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Text part of a history turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// History turn in the shape the generation service expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: ChatRole,
    pub parts: Vec<TextPart>,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            parts: vec![TextPart {
                text: msg.text.clone(),
            }],
        }
    }
}

impl HistoryTurn {
    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

// ═══════════════════════════════════════
// API ENVELOPES
// ═══════════════════════════════════════

/// Chat panel state as served to a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub bot_name: String,
    pub messages: Vec<ChatMessage>,
    pub awaiting_response: bool,
}

/// Persona panel state: the current persona and the last generation outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<GeneratedPersona>,
    pub generating: bool,
    /// Banner text from the last failed generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a chat send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// What a chat send did, plus the chat afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// replied | failed | busy | empty_input | discarded
    pub outcome: String,
    pub chat: ChatSnapshot,
}

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
