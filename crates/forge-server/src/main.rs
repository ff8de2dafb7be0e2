// crates/forge-server/src/main.rs
// Persona Forge - Telegram bot persona generator and chat preview

use anyhow::Result;
use clap::Parser;
use forge::cli::{Cli, Commands, run_chat, run_generate, run_web_server};
use forge::config::ForgeConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    let _ = dotenvy::from_path(ForgeConfig::config_dir().join(".env"));
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    // Set up logging based on command
    let log_level = match &cli.command {
        _ if cli.verbose => Level::INFO,
        Commands::Web { .. } => Level::INFO,
        Commands::Generate { .. } | Commands::Chat { .. } => Level::WARN, // Keep the terminal clean
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            form,
            output,
            username,
            model,
        } => {
            run_generate(form, output, username, model).await?;
        }
        Commands::Chat {
            persona,
            form,
            model,
        } => {
            run_chat(persona, form, model).await?;
        }
        Commands::Web { port, model } => {
            run_web_server(port, model).await?;
        }
    }

    Ok(())
}
