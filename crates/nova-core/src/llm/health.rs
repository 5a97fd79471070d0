//! Last observed backend reachability.
//!
//! Updated by every probe and completion; read by the health endpoint so it
//! can answer without calling the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use nova_types::llm::{BackendStatus, InferenceError};

const UNKNOWN: u8 = 0;
const ONLINE: u8 = 1;
const OFFLINE: u8 = 2;

/// Shared, lock-free holder of the latest [`BackendStatus`].
#[derive(Debug, Clone, Default)]
pub struct BackendHealth {
    state: Arc<AtomicU8>,
}

impl BackendHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> BackendStatus {
        match self.state.load(Ordering::Acquire) {
            ONLINE => BackendStatus::Online,
            OFFLINE => BackendStatus::Offline,
            _ => BackendStatus::Unknown,
        }
    }

    pub fn record(&self, status: BackendStatus) {
        let raw = match status {
            BackendStatus::Unknown => UNKNOWN,
            BackendStatus::Online => ONLINE,
            BackendStatus::Offline => OFFLINE,
        };
        self.state.store(raw, Ordering::Release);
    }

    /// Fold a completion outcome into the status. Timeouts and upstream
    /// errors still prove the process is reachable.
    pub fn record_outcome<T>(&self, outcome: &Result<T, InferenceError>) {
        match outcome {
            Err(InferenceError::Offline(_)) => self.record(BackendStatus::Offline),
            _ => self.record(BackendStatus::Online),
        }
    }
}
