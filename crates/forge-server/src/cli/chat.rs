// crates/forge-server/src/cli/chat.rs
// `forge chat`: terminal chat against a persona

use anyhow::Result;
use dialoguer::Input;
use std::path::PathBuf;

use super::{FormArgs, SavedPersona, build_app, collect_form, load_settings};
use crate::app::ForgeApp;
use crate::chat::{FALLBACK_REPLY, RejectReason, SendOutcome};

/// What a line typed at the prompt asks for.
///
/// REPL commands start with `:` so every `/command` reaches the bot.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplInput {
    Quit,
    Reset,
    BotFather,
    Help,
    Message(String),
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":quit" | ":exit" => ReplInput::Quit,
            ":reset" => ReplInput::Reset,
            ":botfather" => ReplInput::BotFather,
            ":help" => ReplInput::Help,
            other => ReplInput::Message(other.to_string()),
        }
    }
}

const REPL_HELP: &str = "Commands: :reset (restart chat), :botfather (setup text), :quit";

pub async fn run_chat(
    persona: Option<PathBuf>,
    form: FormArgs,
    model: Option<String>,
) -> Result<()> {
    let (_, settings) = load_settings(model)?;
    let app = build_app(&settings);

    match persona {
        Some(path) => {
            let saved = SavedPersona::load(&path)?;
            app.load_persona(saved.persona, saved.bot_name).await;
        }
        None => {
            let form = collect_form(form)?;
            eprintln!("Forging persona with {}...", app.model());
            if let Err(e) = app.generate(form).await {
                anyhow::bail!(e.to_user_string());
            }
        }
    }

    repl(&app).await
}

async fn repl(app: &ForgeApp) -> Result<()> {
    let snapshot = app.chat_snapshot().await?;
    let bot = if snapshot.bot_name.is_empty() {
        "bot".to_string()
    } else {
        snapshot.bot_name.clone()
    };

    println!("{}", REPL_HELP);
    for message in &snapshot.messages {
        println!("{}: {}", bot, message.text);
    }

    loop {
        let line: String = Input::new()
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;

        match ReplInput::parse(&line) {
            ReplInput::Quit => break,
            ReplInput::Help => println!("{}", REPL_HELP),
            ReplInput::Reset => {
                app.reset_chat().await?;
                let snapshot = app.chat_snapshot().await?;
                if let Some(seed) = snapshot.messages.first() {
                    println!("{}: {}", bot, seed.text);
                }
            }
            ReplInput::BotFather => {
                let setup = app.botfather_setup(None).await?;
                println!("{}", setup.render(&snapshot.bot_name));
            }
            ReplInput::Message(text) => match app.send_message(&text).await? {
                SendOutcome::Replied(reply) => println!("{}: {}", bot, reply),
                SendOutcome::Failed => println!("{}: {}", bot, FALLBACK_REPLY),
                SendOutcome::Rejected(RejectReason::EmptyInput) => {}
                SendOutcome::Rejected(RejectReason::Busy) => {
                    eprintln!("Still waiting for a reply.")
                }
                SendOutcome::Discarded => {}
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repl_input() {
        assert_eq!(ReplInput::parse(":quit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("  :exit "), ReplInput::Quit);
        assert_eq!(ReplInput::parse(":reset"), ReplInput::Reset);
        assert_eq!(ReplInput::parse(":botfather"), ReplInput::BotFather);
        assert_eq!(ReplInput::parse(":help"), ReplInput::Help);
        assert_eq!(
            ReplInput::parse("Where's my order?"),
            ReplInput::Message("Where's my order?".to_string())
        );
    }

    #[test]
    fn test_bot_commands_reach_the_bot() {
        for command in ["/help", "/start", "/reset", "/quit", "/treasure"] {
            assert_eq!(
                ReplInput::parse(command),
                ReplInput::Message(command.to_string())
            );
        }
    }
}
