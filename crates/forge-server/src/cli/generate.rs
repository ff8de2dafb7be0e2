// crates/forge-server/src/cli/generate.rs
// `forge generate`: one persona synthesis, printed as BotFather setup

use anyhow::Result;
use std::path::PathBuf;

use super::{FormArgs, SavedPersona, build_app, collect_form, load_settings};
use crate::persona::{BotFatherSetup, lint_persona};

pub async fn run_generate(
    form: FormArgs,
    output: Option<PathBuf>,
    username: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let form = collect_form(form)?;
    let (_, settings) = load_settings(model)?;
    let app = build_app(&settings);

    eprintln!("Forging persona with {}...", app.model());
    let persona = match app.generate(form.clone()).await {
        Ok(persona) => persona,
        Err(e) => anyhow::bail!(e.to_user_string()),
    };

    let bot_name = form.name.trim().to_string();
    let setup = BotFatherSetup::from_persona(&persona, username.as_deref());
    println!("{}", setup.render(&bot_name));

    println!("-- Welcome Message --\n{}\n", persona.welcome_message);

    let findings = lint_persona(&persona);
    if !findings.is_empty() {
        println!("-- Lint --");
        for finding in &findings {
            println!("  - {}", finding);
        }
        println!();
    }

    if let Some(path) = output {
        SavedPersona {
            bot_name,
            persona: (*persona).clone(),
        }
        .save(&path)?;
        eprintln!("Saved persona to {}", path.display());
    }

    Ok(())
}
