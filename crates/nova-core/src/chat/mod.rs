//! Conversation persistence and the chat-turn relay.
//!
//! - `repository`: `ConversationRepository` port
//! - `service`: `ConversationService` (load/list/select/delete/clear/summary)
//! - `save_queue`: per-user serialized background writes
//! - `orchestrator`: `ChatOrchestrator`, one turn end to end

pub mod orchestrator;
pub mod repository;
pub mod save_queue;
pub mod service;
