// crates/forge-server/src/cli/serve.rs
// `forge web`: JSON API server

use anyhow::Result;
use tracing::info;

use super::{DEFAULT_WEB_PORT, build_app, load_settings};
use crate::web::{self, state::AppState};

pub async fn run_web_server(port: Option<u16>, model: Option<String>) -> Result<()> {
    let (env, settings) = load_settings(model)?;
    let port = port.or(env.web_port).unwrap_or(DEFAULT_WEB_PORT);
    let app = build_app(&settings);
    let model_name = app.model().to_string();

    let state = AppState::new(app);
    let router = web::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(model = %model_name, "Persona Forge API running on http://localhost:{}", port);
    println!("Persona Forge API running on http://localhost:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
