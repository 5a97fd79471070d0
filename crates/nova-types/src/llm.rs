//! Inference request/response types.
//!
//! These model the data shapes exchanged with the model-serving backend,
//! independent of its wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::ChatMessage;

/// Request for a chat completion: the full conversation including the new
/// user turn as its last element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

/// Response from the backend for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Last known reachability of the inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Unknown,
    Online,
    Offline,
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Unknown => write!(f, "unknown"),
            BackendStatus::Online => write!(f, "online"),
            BackendStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Errors from the inference backend, normalized across failure modes.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Connection refused or otherwise unreachable.
    #[error("inference backend is offline: {0}")]
    Offline(String),

    #[error("inference backend request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.
    #[error("inference backend error: {status}")]
    Upstream { status: u16, body: String },

    /// A 2xx response that did not carry a completion.
    #[error("malformed inference response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_display_matches_serde() {
        for status in [
            BackendStatus::Unknown,
            BackendStatus::Online,
            BackendStatus::Offline,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_upstream_error_display() {
        let err = InferenceError::Upstream {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "inference backend error: 500");
    }
}
