//! Observability setup for the Nova chat relay.

pub mod tracing_setup;
