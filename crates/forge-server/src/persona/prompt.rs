// crates/forge-server/src/persona/prompt.rs
// Instruction template and output schema for persona synthesis

use forge_types::PersonaFormData;
use serde_json::{Value, json};

/// Intended upper bound for the BotFather description
pub const DESCRIPTION_MAX_CHARS: usize = 512;
/// Intended upper bound for the BotFather about text
pub const ABOUT_MAX_CHARS: usize = 120;

/// Schema fields, in the order they are requested
pub const PERSONA_FIELDS: [(&str, &str); 5] = [
    (
        "systemInstruction",
        "The detailed system prompt for the LLM.",
    ),
    (
        "botFatherDescription",
        "The text for the /setdescription command.",
    ),
    (
        "botFatherAbout",
        "The text for the /setabouttext command.",
    ),
    (
        "welcomeMessage",
        "An engaging starting message from the character.",
    ),
    (
        "botCommands",
        "List of commands in 'command - description' format, separated by newlines.",
    ),
];

/// Build the synthesis instruction for a form submission
pub fn build_persona_prompt(form: &PersonaFormData) -> String {
    format!(
        "Create a comprehensive persona for a Telegram Bot.

Name: {name}
Vibe/Tone: {vibe}
Purpose: {purpose}

I need 5 things:
1. A robust 'System Instruction' that I can feed into an LLM to make it act exactly like this character. It should be detailed about tone, constraints, and behavior.
2. A 'BotFather Description'. This is the text users see *before* they click Start. It explains what the bot does. Max {desc_max} chars.
3. A 'BotFather About Text'. This appears on the bot's profile page. Short, punchy. Max {about_max} chars.
4. A 'Welcome Message'. The first thing the bot sends when someone types /start.
5. A list of 'Bot Commands' formatted for BotFather. Strictly follow the format \"command - description\" (lowercase command, hyphen, description). Include /start, /help, and 2-3 creative commands that fit the persona.
",
        name = form.name.trim(),
        vibe = form.vibe.trim(),
        purpose = form.purpose.trim(),
        desc_max = DESCRIPTION_MAX_CHARS,
        about_max = ABOUT_MAX_CHARS,
    )
}

/// Response schema: an object of five required string properties
pub fn persona_response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = PERSONA_FIELDS
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "STRING", "description": description }),
            )
        })
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": PERSONA_FIELDS.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_form() {
        let form = PersonaFormData::new("Captain Hook", "Pirate", "Customer Support");
        let prompt = build_persona_prompt(&form);
        assert!(prompt.contains("Name: Captain Hook"));
        assert!(prompt.contains("Vibe/Tone: Pirate"));
        assert!(prompt.contains("Purpose: Customer Support"));
        assert!(prompt.contains("Max 512 chars"));
        assert!(prompt.contains("Max 120 chars"));
        assert!(prompt.contains("Include /start, /help"));
    }

    #[test]
    fn test_prompt_trims_fields() {
        let form = PersonaFormData::new("  Hook ", "Pirate\n", " Support");
        let prompt = build_persona_prompt(&form);
        assert!(prompt.contains("Name: Hook\n"));
        assert!(prompt.contains("Vibe/Tone: Pirate\n"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = persona_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        for (name, _) in PERSONA_FIELDS {
            assert!(required.iter().any(|r| r == name), "missing {}", name);
            assert_eq!(schema["properties"][name]["type"], "STRING");
            assert!(schema["properties"][name]["description"].is_string());
        }
    }
}
