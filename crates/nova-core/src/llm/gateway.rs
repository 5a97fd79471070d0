//! InferenceGateway trait definition.
//!
//! The gateway normalizes the backend's failure modes into
//! [`InferenceError`]: connection failures are `Offline`, deadline overruns
//! are `Timeout`, non-2xx replies are `Upstream`.

use nova_types::llm::{BackendStatus, CompletionRequest, CompletionResponse, InferenceError};

/// Port to the external model-serving endpoint.
///
/// Implementations live in nova-infra (e.g., `OpenAiCompatGateway`).
pub trait InferenceGateway: Send + Sync {
    /// Cheap reachability check.
    ///
    /// Any HTTP response, including a 4xx/5xx, means the backend process is
    /// up; only network-level failure yields `Offline`.
    fn probe(&self) -> impl std::future::Future<Output = BackendStatus> + Send;

    /// Send the full conversation and return the assistant's reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, InferenceError>> + Send;
}
