//! Chat relay handler.
//!
//! POST /api/chat - Relay one turn to the inference backend.
//!
//! The turn runs on its own task bounded by the relay timeout. If the
//! deadline passes the caller gets a 504, but the task is not cancelled: the
//! backend call may still finish and its save may still land.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use nova_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let username = req.username.trim().to_string();
    let message = req.message.trim().to_string();
    if username.is_empty() || message.is_empty() {
        return Err(AppError::Validation(
            "Username and message are required".to_string(),
        ));
    }

    let user_id = state
        .credentials
        .find_user(&username)
        .await?
        .ok_or(AppError::InvalidCredentials)?
        .id;

    let orchestrator = state.orchestrator.clone();
    let history = req.conversation_history;
    let turn = tokio::spawn(async move {
        orchestrator
            .handle_turn(user_id, &username, &message, history)
            .await
    });

    let relay_timeout = Duration::from_secs(state.config.server.relay_timeout_secs);
    let outcome = match tokio::time::timeout(relay_timeout, turn).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => {
            return Err(AppError::Internal(format!("Chat turn failed: {join_err}")));
        }
        Err(_) => {
            tracing::warn!(user_id, "Relay timeout elapsed");
            return Err(AppError::BackendTimeout);
        }
    };

    Ok(Json(json!({
        "success": true,
        "response": outcome.reply,
        "conversation_history": outcome.history,
        "saved": true,
    })))
}
