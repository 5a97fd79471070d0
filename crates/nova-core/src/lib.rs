//! Business logic and repository trait definitions for the Nova chat relay.
//!
//! This crate defines the "ports" (repository, hasher, and inference gateway
//! traits) that the infrastructure layer implements, plus the services built
//! on them. It depends only on `nova-types` -- never on `nova-infra` or any
//! database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
