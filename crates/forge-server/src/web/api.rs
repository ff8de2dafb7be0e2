// crates/forge-server/src/web/api.rs
// REST API handlers

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use forge_types::{
    ApiResponse, ChatSnapshot, PersonaFormData, PersonaStatus, SendMessageRequest,
    SendMessageResponse,
};
use serde::{Deserialize, Serialize};

use crate::chat::{RejectReason, SendOutcome};
use crate::web::state::AppState;

// ═══════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.app.model(),
    }))
}

// ═══════════════════════════════════════
// PERSONA
// ═══════════════════════════════════════

/// Current persona, generation flag and error banner
pub async fn get_persona(State(state): State<AppState>) -> Json<ApiResponse<PersonaStatus>> {
    Json(ApiResponse::ok(state.app.status().await))
}

/// Generate a persona from the form fields
pub async fn generate_persona(
    State(state): State<AppState>,
    Json(form): Json<PersonaFormData>,
) -> Json<ApiResponse<PersonaStatus>> {
    match state.app.generate(form).await {
        Ok(_) => Json(ApiResponse::ok(state.app.status().await)),
        Err(e) => Json(ApiResponse::err(e.to_user_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct BotFatherQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotFatherView {
    pub set_description: String,
    pub set_about_text: String,
    pub commands: String,
    pub system_instruction: String,
}

/// Paste-ready BotFather commands for the current persona
pub async fn get_botfather(
    State(state): State<AppState>,
    Query(query): Query<BotFatherQuery>,
) -> Json<ApiResponse<BotFatherView>> {
    match state.app.botfather_setup(query.username.as_deref()).await {
        Ok(setup) => Json(ApiResponse::ok(BotFatherView {
            set_description: setup.set_description,
            set_about_text: setup.set_about_text,
            commands: setup.commands,
            system_instruction: setup.system_instruction,
        })),
        Err(e) => Json(ApiResponse::err(e.to_user_string())),
    }
}

// ═══════════════════════════════════════
// CHAT
// ═══════════════════════════════════════

pub async fn get_chat(State(state): State<AppState>) -> Json<ApiResponse<ChatSnapshot>> {
    match state.app.chat_snapshot().await {
        Ok(snapshot) => Json(ApiResponse::ok(snapshot)),
        Err(e) => Json(ApiResponse::err(e.to_user_string())),
    }
}

fn outcome_label(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Replied(_) => "replied",
        SendOutcome::Failed => "failed",
        SendOutcome::Rejected(RejectReason::Busy) => "busy",
        SendOutcome::Rejected(RejectReason::EmptyInput) => "empty_input",
        SendOutcome::Discarded => "discarded",
    }
}

/// Send one message and wait for the reply
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Json<ApiResponse<SendMessageResponse>> {
    let session = match state.app.session().await {
        Ok(session) => session,
        Err(e) => return Json(ApiResponse::err(e.to_user_string())),
    };

    let outcome = session.send(&req.message).await;
    Json(ApiResponse::ok(SendMessageResponse {
        outcome: outcome_label(&outcome).to_string(),
        chat: session.snapshot().await,
    }))
}

pub async fn reset_chat(State(state): State<AppState>) -> Json<ApiResponse<ChatSnapshot>> {
    match state.app.session().await {
        Ok(session) => {
            session.reset().await;
            Json(ApiResponse::ok(session.snapshot().await))
        }
        Err(e) => Json(ApiResponse::err(e.to_user_string())),
    }
}
