//! Repository trait definitions (ports) for data persistence.
//!
//! Conversation persistence lives with the chat module
//! (`crate::chat::repository`); user identity records live here.

pub mod user;
