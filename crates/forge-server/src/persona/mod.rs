// crates/forge-server/src/persona/mod.rs
// Persona synthesis and BotFather output

pub mod botfather;
pub mod commands;
pub mod prompt;
pub mod synthesis;

pub use botfather::{BotFatherSetup, USERNAME_PLACEHOLDER};
pub use commands::{CommandList, LintFinding, lint_persona, parse_commands};
pub use synthesis::{PersonaSynthesizer, parse_persona, validate_form};
