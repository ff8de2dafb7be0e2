// crates/forge-server/src/web/state.rs
// Web server state management

use std::sync::Arc;

use crate::app::ForgeApp;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persona and chat controller
    pub app: Arc<ForgeApp>,
}

impl AppState {
    pub fn new(app: Arc<ForgeApp>) -> Self {
        Self { app }
    }
}
