// crates/forge-server/src/persona/synthesis.rs
// Persona synthesis adapter: form -> structured generation call -> GeneratedPersona

use std::sync::Arc;

use forge_types::{GeneratedPersona, PersonaFormData};
use tracing::{info, warn};

use super::commands::lint_persona;
use super::prompt::{build_persona_prompt, persona_response_schema};
use crate::error::{ForgeError, Result, SynthesisCause};
use crate::llm::{GenerateRequest, LlmClient, ResponseFormat};

/// Validate a form submission before any network call
pub fn validate_form(form: &PersonaFormData) -> Result<()> {
    match form.first_missing_field() {
        Some(field) => Err(ForgeError::InvalidInput(format!("{} is required", field))),
        None => Ok(()),
    }
}

/// Parse the model's text as a persona.
///
/// Tolerates a surrounding markdown code fence; anything else that does not
/// match the schema is a malformed response.
pub fn parse_persona(text: &str) -> Result<GeneratedPersona> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ForgeError::synthesis(
            SynthesisCause::EmptyResponse,
            "no response text",
        ));
    }

    serde_json::from_str(strip_code_fence(trimmed))
        .map_err(|e| ForgeError::synthesis(SynthesisCause::MalformedResponse, e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Generates personas through an injected LLM client
pub struct PersonaSynthesizer {
    client: Arc<dyn LlmClient>,
    temperature: Option<f32>,
}

impl PersonaSynthesizer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// One synthesis attempt; no retries.
    pub async fn synthesize(&self, form: &PersonaFormData) -> Result<GeneratedPersona> {
        validate_form(form)?;

        let request = GenerateRequest::prompt(build_persona_prompt(form))
            .with_response_format(ResponseFormat::json(persona_response_schema()))
            .with_temperature(self.temperature);

        let result = self.client.generate(request).await.map_err(|e| {
            warn!(error = %e, "Persona generation call failed");
            ForgeError::synthesis(SynthesisCause::Request, e.to_string())
        })?;

        let text = result.text.unwrap_or_default();
        let persona = parse_persona(&text).inspect_err(|e| {
            warn!(
                request_id = %result.request_id,
                error = %e,
                "Persona response rejected"
            );
        })?;

        let lint = lint_persona(&persona);
        for finding in &lint {
            warn!(request_id = %result.request_id, finding = %finding, "Persona lint");
        }

        info!(
            request_id = %result.request_id,
            name = %form.name.trim(),
            lint_findings = lint.len(),
            "Persona synthesized"
        );

        Ok(persona)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "systemInstruction": "You are Captain Hook.",
        "botFatherDescription": "A pirate who finds your parcels.",
        "botFatherAbout": "Arr. Support on the high seas.",
        "welcomeMessage": "Ahoy, matey!",
        "botCommands": "start - Board the ship\nhelp - Call for aid\ntreasure - Track an order\nplank - Cancel an order"
    }"#;

    // ============================================================================
    // validate_form tests
    // ============================================================================

    #[test]
    fn test_validate_form_ok() {
        let form = PersonaFormData::new("Captain Hook", "Pirate", "Customer Support");
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_validate_form_names_missing_field() {
        let form = PersonaFormData::new("Captain Hook", "Pirate", "  ");
        let err = validate_form(&form).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidInput(_)));
        assert!(err.to_string().contains("purpose is required"));
    }

    // ============================================================================
    // parse_persona tests
    // ============================================================================

    #[test]
    fn test_parse_valid_persona() {
        let persona = parse_persona(VALID).unwrap();
        assert_eq!(persona.welcome_message, "Ahoy, matey!");
        assert!(persona.bot_commands.starts_with("start - "));
    }

    #[test]
    fn test_parse_fenced_persona() {
        let fenced = format!("```json\n{}\n```", VALID);
        let persona = parse_persona(&fenced).unwrap();
        assert_eq!(persona.system_instruction, "You are Captain Hook.");
    }

    #[test]
    fn test_parse_empty_text() {
        let err = parse_persona("   ").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Synthesis {
                cause: SynthesisCause::EmptyResponse,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_persona("Here is your persona: Captain Hook").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Synthesis {
                cause: SynthesisCause::MalformedResponse,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_persona(r#"{"systemInstruction": "x"}"#).unwrap_err();
        assert!(err.is_synthesis());
        assert!(err.to_string().contains("malformed_response"));
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{}"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
    }

    // ============================================================================
    // PersonaSynthesizer tests
    // ============================================================================

    use crate::test_utils::{ScriptedClient, sample_persona, sample_persona_json};

    #[tokio::test]
    async fn test_synthesize_sends_structured_request() {
        let client = ScriptedClient::with_texts([sample_persona_json()]);
        let synth = PersonaSynthesizer::new(client.clone()).with_temperature(Some(0.9));

        let form = PersonaFormData::new("Captain Hook", "Pirate", "Customer Support");
        let persona = synth.synthesize(&form).await.unwrap();
        assert_eq!(persona, sample_persona());

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert!(req.system_instruction.is_none());
        assert_eq!(req.temperature, Some(0.9));
        assert_eq!(req.contents.len(), 1);
        assert!(req.contents[0].text().contains("Captain Hook"));
        let format = req.response_format.as_ref().unwrap();
        assert_eq!(format.mime_type, "application/json");
        assert_eq!(format.schema["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_synthesize_invalid_form_makes_no_call() {
        let client = ScriptedClient::new();
        let synth = PersonaSynthesizer::new(client.clone());
        let err = synth
            .synthesize(&PersonaFormData::new("", "Pirate", "Support"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::InvalidInput(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_synthesize_failure_causes() {
        let form = PersonaFormData::new("Captain Hook", "Pirate", "Support");

        let client = ScriptedClient::new();
        client.push_failure("API error 403");
        client.push_no_text();
        client.push_text("not json at all");
        let synth = PersonaSynthesizer::new(client);

        let causes: Vec<SynthesisCause> = [
            synth.synthesize(&form).await,
            synth.synthesize(&form).await,
            synth.synthesize(&form).await,
        ]
        .into_iter()
        .map(|r| match r.unwrap_err() {
            ForgeError::Synthesis { cause, .. } => cause,
            other => panic!("unexpected error: {other}"),
        })
        .collect();

        assert_eq!(
            causes,
            vec![
                SynthesisCause::Request,
                SynthesisCause::EmptyResponse,
                SynthesisCause::MalformedResponse
            ]
        );
    }
}
