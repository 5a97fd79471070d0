//! Inference backend abstractions.
//!
//! - `InferenceGateway`: RPITIT port implemented by the HTTP adapter in nova-infra
//! - `BackendHealth`: last observed reachability, shared with the health endpoint

pub mod gateway;
pub mod health;
