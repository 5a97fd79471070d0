//! Account handlers.
//!
//! Endpoints:
//! - POST /api/user/register - Create an account
//! - POST /api/user/login    - Verify credentials

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/user/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<Value>, AppError> {
    state.credentials.register(&req.username, &req.password).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User registered successfully",
    })))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<Value>, AppError> {
    let auth = state
        .credentials
        .authenticate(&req.username, &req.password)
        .await?;

    tracing::info!(user_id = auth.user.id, "User logged in");

    Ok(Json(json!({
        "success": true,
        "user_id": auth.user.id,
        "username": auth.user.username,
        "created_at": auth.user.created_at,
        "has_conversations": auth.has_conversations,
        "is_new_user": auth.is_new_user(),
    })))
}
