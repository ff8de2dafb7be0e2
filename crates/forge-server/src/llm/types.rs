// crates/forge-server/src/llm/types.rs
// Provider-neutral request/response types for generation calls

use forge_types::{ChatMessage, HistoryTurn};
use serde_json::Value;

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Structured output constraint (JSON mode)
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub mime_type: String,
    pub schema: Value,
}

impl ResponseFormat {
    /// JSON output validated against `schema`
    pub fn json(schema: Value) -> Self {
        Self {
            mime_type: "application/json".to_string(),
            schema,
        }
    }
}

/// One call to the generation service
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Session-wide directive (chat mode)
    pub system_instruction: Option<String>,
    /// Ordered turns; the last one is the new user turn
    pub contents: Vec<HistoryTurn>,
    pub response_format: Option<ResponseFormat>,
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    /// Single-turn prompt, no system instruction
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![HistoryTurn::from(&ChatMessage::user(text))],
            ..Default::default()
        }
    }

    /// Chat exchange: prior history, then the new user message
    pub fn chat(system_instruction: &str, history: Vec<HistoryTurn>, message: &str) -> Self {
        let mut contents = history;
        contents.push(HistoryTurn::from(&ChatMessage::user(message)));
        Self {
            system_instruction: Some(system_instruction.to_string()),
            contents,
            ..Default::default()
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Result of a generation call
#[derive(Debug, Clone, Default)]
pub struct GenerateResult {
    pub request_id: String,
    /// Concatenated answer text; `None` when the model returned no text
    pub text: Option<String>,
    pub usage: Option<Usage>,
    pub duration_ms: u64,
}
