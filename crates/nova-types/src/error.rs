use thiserror::Error;

use crate::llm::InferenceError;

/// Errors from repository operations (used by trait definitions in nova-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from registration and login.
///
/// `InvalidCredentials` is returned for both an unknown username and a wrong
/// password.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0}")]
    Validation(String),

    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("username already exists")]
    AlreadyExists,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from conversation reads and management.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("{0}")]
    Validation(String),

    #[error("conversation not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("inference backend is offline")]
    BackendOffline,

    #[error("inference backend request timed out")]
    BackendTimeout,

    #[error("inference backend error: {0}")]
    BackendUpstream(String),
}

impl From<InferenceError> for ChatError {
    fn from(e: InferenceError) -> Self {
        match e {
            InferenceError::Offline(_) => ChatError::BackendOffline,
            InferenceError::Timeout => ChatError::BackendTimeout,
            other => ChatError::BackendUpstream(other.to_string()),
        }
    }
}
