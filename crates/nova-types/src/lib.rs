//! Shared domain types for the Nova chat relay.
//!
//! Users, conversations, chat messages, inference request/response shapes,
//! configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod user;
