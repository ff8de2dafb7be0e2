// crates/forge-server/src/cli/mod.rs
// CLI module for Persona Forge commands

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dialoguer::Input;
use forge_types::{GeneratedPersona, PersonaFormData};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

pub mod chat;
pub mod generate;
pub mod serve;

pub use chat::run_chat;
pub use generate::run_generate;
pub use serve::run_web_server;

use crate::app::ForgeApp;
use crate::config::{EnvConfig, ForgeConfig, Settings};
use crate::http::create_shared_client;
use crate::llm::GeminiClient;

/// Port used by `forge web` when neither flag nor env sets one
pub const DEFAULT_WEB_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Generate Telegram bot personas and chat with them")]
#[command(version)]
pub struct Cli {
    /// Show info-level logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// The three persona fields; prompted for when missing
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Bot name (e.g. "Captain Hook")
    #[arg(long)]
    pub name: Option<String>,

    /// Personality / vibe (e.g. "Pirate")
    #[arg(long)]
    pub vibe: Option<String>,

    /// What the bot is for (e.g. "Customer Support")
    #[arg(long)]
    pub purpose: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a persona and print the BotFather setup
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Save the persona as JSON for `forge chat --persona`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bot username to fill into the BotFather commands
        #[arg(short, long)]
        username: Option<String>,

        /// Gemini model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Chat with a persona in the terminal
    Chat {
        /// Persona JSON written by `forge generate --output`
        #[arg(short, long, conflicts_with_all = ["name", "vibe", "purpose"])]
        persona: Option<PathBuf>,

        #[command(flatten)]
        form: FormArgs,

        /// Gemini model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run the JSON API server
    Web {
        /// Port to listen on (default: FORGE_WEB_PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Gemini model override
        #[arg(short, long)]
        model: Option<String>,
    },
}

/// Load env + config file and layer them with the CLI model flag
pub fn load_settings(cli_model: Option<String>) -> Result<(EnvConfig, Settings)> {
    let env = EnvConfig::load();
    let validation = env.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        bail!("Invalid configuration:\n{}", validation.report());
    }

    let file = ForgeConfig::load();
    let settings = Settings::resolve(cli_model, &env, &file);
    Ok((env, settings))
}

/// Build the controller around a Gemini client
pub fn build_app(settings: &Settings) -> Arc<ForgeApp> {
    let client = GeminiClient::with_http_client(
        settings.api_key.clone(),
        settings.model.clone(),
        create_shared_client(),
    )
    .with_base_url(settings.api_base.clone());

    Arc::new(ForgeApp::with_options(
        Arc::new(client),
        settings.temperature,
        settings.failure_policy,
    ))
}

/// Fill missing form fields interactively
pub fn collect_form(args: FormArgs) -> Result<PersonaFormData> {
    let interactive = std::io::stdin().is_terminal();

    let ask = |value: Option<String>, label: &str| -> Result<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ if interactive => Ok(Input::<String>::new().with_prompt(label).interact_text()?),
            _ => bail!("--{} is required when not running in a terminal", label.to_lowercase()),
        }
    };

    Ok(PersonaFormData::new(
        ask(args.name, "Name")?,
        ask(args.vibe, "Vibe")?,
        ask(args.purpose, "Purpose")?,
    ))
}

/// A persona as saved to disk, with the name it was generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPersona {
    #[serde(default)]
    pub bot_name: String,
    #[serde(flatten)]
    pub persona: GeneratedPersona,
}

impl SavedPersona {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write persona to {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("{} is not a persona file", path.display()))
    }
}
