//! Conversation management handlers.
//!
//! Endpoints (all POST, keyed by `username` in the body):
//! - /api/conversation/load     - Latest conversation
//! - /api/conversation/list     - All conversations, newest first
//! - /api/conversation/select   - One conversation by id
//! - /api/conversation/delete   - Delete one conversation by id
//! - /api/conversation/clear    - Delete all conversations
//! - /api/conversation/summary  - Preview of the latest conversation
//! - /api/conversation/new      - Start an additional conversation

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use nova_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationIdRequest {
    #[serde(default)]
    pub username: String,
    pub conversation_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewConversationRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Both fields are required; an id of 0 counts as missing.
fn require_id(req: &ConversationIdRequest) -> Result<i64, AppError> {
    match req.conversation_id {
        Some(id) if id != 0 && !req.username.trim().is_empty() => Ok(id),
        _ => Err(AppError::Validation(
            "Username and conversation_id are required".to_string(),
        )),
    }
}

/// POST /api/conversation/load
pub async fn load(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UsernameRequest>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state.conversations.load_latest(&req.username).await?;
    Ok(Json(json!({
        "success": true,
        "messages": snapshot.messages,
        "updated_at": snapshot.updated_at,
    })))
}

/// POST /api/conversation/list
pub async fn list(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UsernameRequest>,
) -> Result<Json<Value>, AppError> {
    let conversations = state.conversations.list(&req.username).await?;
    Ok(Json(json!({
        "success": true,
        "conversations": conversations,
    })))
}

/// POST /api/conversation/select
pub async fn select(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ConversationIdRequest>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(&req)?;
    let snapshot = state.conversations.select(&req.username, id).await?;
    Ok(Json(json!({
        "success": true,
        "messages": snapshot.messages,
        "updated_at": snapshot.updated_at,
    })))
}

/// POST /api/conversation/delete
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ConversationIdRequest>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(&req)?;
    state.conversations.delete(&req.username, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Conversation deleted successfully",
    })))
}

/// POST /api/conversation/clear
pub async fn clear(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UsernameRequest>,
) -> Result<Json<Value>, AppError> {
    state.conversations.clear_all(&req.username).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Conversation cleared",
    })))
}

/// POST /api/conversation/summary
pub async fn summary(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UsernameRequest>,
) -> Result<Json<Value>, AppError> {
    let preview = state.conversations.summary(&req.username).await?;
    Ok(Json(json!({
        "success": true,
        "timestamp": preview.updated_at,
        "total_messages": preview.total_messages,
        "preview_messages": preview.preview,
    })))
}

/// POST /api/conversation/new
pub async fn start_new(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewConversationRequest>,
) -> Result<Json<Value>, AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if state.credentials.find_user(&req.username).await?.is_none() {
        return Err(AppError::InvalidCredentials);
    }

    let conversation = state
        .conversations
        .start_new(&req.username, &req.messages)
        .await?;
    Ok(Json(json!({
        "success": true,
        "conversation_id": conversation.id,
        "updated_at": conversation.updated_at,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, conversation_id: Option<i64>) -> ConversationIdRequest {
        ConversationIdRequest {
            username: username.to_string(),
            conversation_id,
        }
    }

    #[test]
    fn require_id_rejects_missing_fields() {
        assert!(matches!(
            require_id(&request("alice", None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_id(&request("  ", Some(3))),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn require_id_treats_zero_as_missing() {
        assert!(matches!(
            require_id(&request("alice", Some(0))),
            Err(AppError::Validation(_))
        ));
        assert_eq!(require_id(&request("alice", Some(3))).ok(), Some(3));
    }
}
