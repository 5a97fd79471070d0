//! Infrastructure layer for the Nova chat relay.
//!
//! Implements the ports defined in `nova-core`: SQLite repositories, the
//! Argon2id credential hasher, and the OpenAI-compatible inference gateway.
//! Also owns configuration file loading.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
