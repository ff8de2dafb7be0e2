// crates/forge-server/src/web/mod.rs
// JSON API over the persona and chat operations

pub mod api;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .route("/health", get(api::health))
        .route("/persona", get(api::get_persona).post(api::generate_persona))
        .route("/persona/botfather", get(api::get_botfather))
        .route("/chat", get(api::get_chat).post(api::send_message))
        .route("/chat/reset", post(api::reset_chat));

    Router::new()
        // Health check at root level
        .route("/health", get(api::health))
        .nest("/api", api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
