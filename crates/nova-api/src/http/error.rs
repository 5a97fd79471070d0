//! Application error type mapping to HTTP status codes.
//!
//! Every failure is rendered as `{"success": false, "error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use nova_types::error::{ChatError, ConversationError, CredentialError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400).
    Validation(String),
    /// Unknown user or wrong password (401).
    InvalidCredentials,
    /// Resource absent or not owned by the caller (404).
    NotFound(String),
    /// Inference backend unreachable (503).
    BackendOffline,
    /// Inference backend or relay deadline exceeded (504).
    BackendTimeout,
    /// Inference backend answered with an error (500).
    Upstream(String),
    /// Database failure (500).
    Storage(String),
    /// Anything else (500).
    Internal(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BackendOffline => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Nova AI is offline".to_string(),
            ),
            AppError::BackendTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Nova AI request timeout".to_string(),
            ),
            AppError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Nova AI error: {msg}"),
            ),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {msg}"),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Validation(msg) => AppError::Validation(msg),
            CredentialError::WeakPassword { min_length } => AppError::Validation(format!(
                "Password must be at least {min_length} characters"
            )),
            CredentialError::AlreadyExists => {
                AppError::Validation("Username already exists".to_string())
            }
            CredentialError::InvalidCredentials => AppError::InvalidCredentials,
            CredentialError::Hashing(msg) => AppError::Internal(msg),
            CredentialError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        match e {
            ConversationError::Validation(msg) => AppError::Validation(msg),
            ConversationError::NotFound => AppError::NotFound(
                "Conversation not found or not owned by user".to_string(),
            ),
            ConversationError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(msg) => AppError::Validation(msg),
            ChatError::BackendOffline => AppError::BackendOffline,
            ChatError::BackendTimeout => AppError::BackendTimeout,
            ChatError::BackendUpstream(msg) => AppError::Upstream(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_types::error::RepositoryError;

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().status_and_message().0
    }

    #[test]
    fn credential_errors_map_to_4xx() {
        assert_eq!(
            status_of(CredentialError::WeakPassword { min_length: 4 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(CredentialError::AlreadyExists), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(CredentialError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn chat_errors_have_distinct_statuses() {
        assert_eq!(status_of(ChatError::BackendOffline), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(ChatError::BackendTimeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_of(ChatError::BackendUpstream("502".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_errors_are_500() {
        assert_eq!(
            status_of(ConversationError::Storage(RepositoryError::Connection)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(ConversationError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn weak_password_message_names_minimum() {
        let (_, msg) = AppError::from(CredentialError::WeakPassword { min_length: 6 })
            .status_and_message();
        assert_eq!(msg, "Password must be at least 6 characters");
    }
}
