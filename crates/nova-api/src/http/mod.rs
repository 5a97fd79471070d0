//! HTTP/JSON API layer.
//!
//! Axum router under `/api/` with a flat `{"success": ...}` response shape
//! and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
