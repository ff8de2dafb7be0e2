// crates/forge-server/src/llm/gemini/conversion.rs
// Request conversion from forge types to Gemini format

use crate::llm::GenerateRequest;
use crate::llm::gemini::types::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiSystemInstruction, GenerationConfig,
};
use forge_types::HistoryTurn;

/// Convert a history turn to Gemini content (roles map one to one)
pub fn convert_turn(turn: &HistoryTurn) -> GeminiContent {
    GeminiContent {
        role: turn.role.as_str().to_string(),
        parts: turn
            .parts
            .iter()
            .map(|p| GeminiPart::text(p.text.clone()))
            .collect(),
    }
}

/// Build the full generateContent request body
pub fn build_request(request: &GenerateRequest) -> GeminiRequest {
    let system_instruction = request
        .system_instruction
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| GeminiSystemInstruction {
            parts: vec![GeminiPart::text(s.clone())],
        });

    let generation_config = GenerationConfig {
        temperature: request.temperature,
        response_mime_type: request.response_format.as_ref().map(|f| f.mime_type.clone()),
        response_schema: request.response_format.as_ref().map(|f| f.schema.clone()),
    };

    GeminiRequest {
        contents: request.contents.iter().map(convert_turn).collect(),
        system_instruction,
        generation_config: if generation_config.is_empty() {
            None
        } else {
            Some(generation_config)
        },
    }
}
