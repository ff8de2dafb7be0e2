// crates/forge-server/src/persona/commands.rs
// BotFather command list parsing and persona lint checks
//
// Lint findings are advisory. Length and format limits are only requested
// from the model, never enforced on the generated persona.

use forge_types::{BotCommand, GeneratedPersona};
use std::fmt;

use super::prompt::{ABOUT_MAX_CHARS, DESCRIPTION_MAX_CHARS};

/// BotFather command tokens: lowercase letters, digits, underscores
const MAX_COMMAND_CHARS: usize = 32;

/// Commands every persona is asked to include
pub const REQUIRED_COMMANDS: [&str; 2] = ["start", "help"];

/// A line of `botCommands` that could not be read as "command - description"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line_number: usize,
    pub content: String,
}

/// Parsed command list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandList {
    pub commands: Vec<BotCommand>,
    pub malformed: Vec<MalformedLine>,
}

impl CommandList {
    pub fn contains(&self, command: &str) -> bool {
        self.commands.iter().any(|c| c.command == command)
    }

    /// Render back to BotFather's /setcommands format
    pub fn to_botfather_text(&self) -> String {
        self.commands
            .iter()
            .map(|c| format!("{} - {}", c.command, c.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse newline-separated "command - description" lines.
///
/// A leading slash is dropped and blank lines are skipped.
pub fn parse_commands(text: &str) -> CommandList {
    let mut list = CommandList::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(" - ") {
            Some((command, description))
                if !command.trim().is_empty() && !description.trim().is_empty() =>
            {
                list.commands.push(BotCommand {
                    command: command.trim().trim_start_matches('/').to_string(),
                    description: description.trim().to_string(),
                });
            }
            _ => list.malformed.push(MalformedLine {
                line_number: idx + 1,
                content: line.to_string(),
            }),
        }
    }

    list
}

/// Whether a token is accepted by BotFather as a command name
pub fn is_valid_command_token(token: &str) -> bool {
    !token.is_empty()
        && token.chars().count() <= MAX_COMMAND_CHARS
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Advisory issue found in a generated persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintFinding {
    MissingCommand(&'static str),
    InvalidCommandToken(String),
    MalformedCommandLine(usize),
    DescriptionTooLong(usize),
    AboutTooLong(usize),
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintFinding::MissingCommand(cmd) => write!(f, "missing /{} command", cmd),
            LintFinding::InvalidCommandToken(token) => {
                write!(f, "'{}' is not a valid BotFather command", token)
            }
            LintFinding::MalformedCommandLine(line) => {
                write!(f, "command line {} is not 'command - description'", line)
            }
            LintFinding::DescriptionTooLong(len) => write!(
                f,
                "description is {} chars (BotFather limit {})",
                len, DESCRIPTION_MAX_CHARS
            ),
            LintFinding::AboutTooLong(len) => write!(
                f,
                "about text is {} chars (BotFather limit {})",
                len, ABOUT_MAX_CHARS
            ),
        }
    }
}

/// Check a persona against BotFather's expectations
pub fn lint_persona(persona: &GeneratedPersona) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    let list = parse_commands(&persona.bot_commands);

    for required in REQUIRED_COMMANDS {
        if !list.contains(required) {
            findings.push(LintFinding::MissingCommand(required));
        }
    }

    for cmd in &list.commands {
        if !is_valid_command_token(&cmd.command) {
            findings.push(LintFinding::InvalidCommandToken(cmd.command.clone()));
        }
    }

    for line in &list.malformed {
        findings.push(LintFinding::MalformedCommandLine(line.line_number));
    }

    let description_len = persona.bot_father_description.chars().count();
    if description_len > DESCRIPTION_MAX_CHARS {
        findings.push(LintFinding::DescriptionTooLong(description_len));
    }

    let about_len = persona.bot_father_about.chars().count();
    if about_len > ABOUT_MAX_CHARS {
        findings.push(LintFinding::AboutTooLong(about_len));
    }

    findings
}
