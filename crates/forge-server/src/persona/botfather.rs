// crates/forge-server/src/persona/botfather.rs
// Ready-to-paste BotFather setup text for a generated persona

use forge_types::GeneratedPersona;

use super::commands::parse_commands;

/// Stand-in used when the user has not supplied a bot username
pub const USERNAME_PLACEHOLDER: &str = "<your_bot_username>";

/// The pieces a user sends to BotFather, plus the backend prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotFatherSetup {
    /// `/setdescription @bot <description>`
    pub set_description: String,
    /// `/setabouttext @bot <about>`
    pub set_about_text: String,
    /// Body to send after `/setcommands`
    pub commands: String,
    /// System prompt for the bot backend
    pub system_instruction: String,
}

impl BotFatherSetup {
    pub fn from_persona(persona: &GeneratedPersona, username: Option<&str>) -> Self {
        let handle = username
            .map(|u| u.trim().trim_start_matches('@'))
            .filter(|u| !u.is_empty())
            .unwrap_or(USERNAME_PLACEHOLDER);

        let parsed = parse_commands(&persona.bot_commands);
        // Keep the raw text unless every line parsed, so nothing is lost
        let commands = if parsed.commands.is_empty() || !parsed.malformed.is_empty() {
            persona.bot_commands.trim().to_string()
        } else {
            parsed.to_botfather_text()
        };

        Self {
            set_description: format!(
                "/setdescription @{} {}",
                handle, persona.bot_father_description
            ),
            set_about_text: format!("/setabouttext @{} {}", handle, persona.bot_father_about),
            commands,
            system_instruction: persona.system_instruction.clone(),
        }
    }

    /// Plain-text report for terminal output
    pub fn render(&self, bot_name: &str) -> String {
        let title = if bot_name.trim().is_empty() {
            "Bot Preview"
        } else {
            bot_name.trim()
        };

        format!(
            "== {title} ==\n\n\
             -- Description --\n{}\n\n\
             -- About Text --\n{}\n\n\
             -- Commands (send after /setcommands) --\n{}\n\n\
             -- System Instruction --\n{}\n\n\
             Paste this into your bot backend (e.g., OpenAI system role, Gemini system_instruction).\n",
            self.set_description, self.set_about_text, self.commands, self.system_instruction,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> GeneratedPersona {
        GeneratedPersona {
            system_instruction: "You are Captain Hook.".to_string(),
            bot_father_description: "A pirate who finds your parcels.".to_string(),
            bot_father_about: "Arr.".to_string(),
            welcome_message: "Ahoy!".to_string(),
            bot_commands: "/start - Board\nhelp - Aid".to_string(),
        }
    }

    #[test]
    fn test_setup_with_placeholder() {
        let setup = BotFatherSetup::from_persona(&persona(), None);
        assert_eq!(
            setup.set_description,
            "/setdescription @<your_bot_username> A pirate who finds your parcels."
        );
        assert_eq!(setup.set_about_text, "/setabouttext @<your_bot_username> Arr.");
        assert_eq!(setup.commands, "start - Board\nhelp - Aid");
    }

    #[test]
    fn test_setup_with_username() {
        let setup = BotFatherSetup::from_persona(&persona(), Some("@hook_bot"));
        assert!(setup.set_description.starts_with("/setdescription @hook_bot "));
        assert!(setup.set_about_text.starts_with("/setabouttext @hook_bot "));
    }

    #[test]
    fn test_blank_username_uses_placeholder() {
        let setup = BotFatherSetup::from_persona(&persona(), Some("  "));
        assert!(setup.set_about_text.contains(USERNAME_PLACEHOLDER));
    }

    #[test]
    fn test_unparseable_commands_kept_raw() {
        let mut p = persona();
        p.bot_commands = "start: begin\nhelp: aid".to_string();
        let setup = BotFatherSetup::from_persona(&p, None);
        assert_eq!(setup.commands, "start: begin\nhelp: aid");
    }

    #[test]
    fn test_render_sections() {
        let setup = BotFatherSetup::from_persona(&persona(), None);
        let out = setup.render("Captain Hook");
        assert!(out.starts_with("== Captain Hook =="));
        assert!(out.contains("-- Description --"));
        assert!(out.contains("-- System Instruction --\nYou are Captain Hook."));
        assert!(setup.render("").starts_with("== Bot Preview =="));
    }

    #[test]
    fn test_partially_malformed_commands_kept_raw() {
        let mut p = persona();
        p.bot_commands = "start - Board\nhelp: aid\ntreasure - Track".to_string();
        let setup = BotFatherSetup::from_persona(&p, None);
        assert_eq!(setup.commands, "start - Board\nhelp: aid\ntreasure - Track");
        assert!(setup.render("Hook").contains("help: aid"));
    }
}
