// crates/forge-server/src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::gemini::types::{GeminiContent, GeminiResponse};

/// Extract text content from Gemini response content (non-thought parts only)
pub fn extract_content(content: &GeminiContent) -> Option<String> {
    let text_parts: Vec<&str> = content
        .parts
        .iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(""))
    }
}

/// Text of the first candidate, if it has any
pub fn first_candidate_text(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(extract_content)
}

/// Finish reason of the first candidate, if reported
pub fn first_finish_reason(response: &GeminiResponse) -> Option<&str> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.finish_reason.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::GeminiPart;

    fn parse(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    // ============================================================================
    // extract_content tests
    // ============================================================================

    #[test]
    fn test_extract_content_single_text() {
        let content = GeminiContent {
            role: "model".to_string(),
            parts: vec![GeminiPart::text("Hello world")],
        };
        assert_eq!(extract_content(&content), Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_content_joins_parts() {
        let content = GeminiContent {
            role: "model".to_string(),
            parts: vec![GeminiPart::text("Hello "), GeminiPart::text("world")],
        };
        assert_eq!(extract_content(&content), Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_content_skips_thoughts() {
        let content = GeminiContent {
            role: "model".to_string(),
            parts: vec![
                GeminiPart {
                    text: Some("thinking...".to_string()),
                    thought: true,
                },
                GeminiPart::text("Answer"),
            ],
        };
        assert_eq!(extract_content(&content), Some("Answer".to_string()));
    }

    #[test]
    fn test_extract_content_empty() {
        let content = GeminiContent {
            role: "model".to_string(),
            parts: vec![],
        };
        assert_eq!(extract_content(&content), None);
    }

    // ============================================================================
    // Response-level helpers
    // ============================================================================

    #[test]
    fn test_first_candidate_text() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Arr"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(first_candidate_text(&response), Some("Arr".to_string()));
        assert_eq!(first_finish_reason(&response), Some("STOP"));
    }

    #[test]
    fn test_first_candidate_without_content() {
        let response = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert_eq!(first_candidate_text(&response), None);
        assert_eq!(first_finish_reason(&response), Some("SAFETY"));
    }

    #[test]
    fn test_no_candidates() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"OTHER"}}"#);
        assert_eq!(first_candidate_text(&response), None);
        assert_eq!(first_finish_reason(&response), None);
    }
}
