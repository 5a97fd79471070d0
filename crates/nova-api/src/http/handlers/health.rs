//! Health endpoint.
//!
//! - GET /api/health              - Server up, last known backend status
//! - GET /api/health?probe=true   - Same, after a live backend probe

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    pub probe: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>, Query(query): Query<HealthQuery>) -> Json<Value> {
    let status = if query.probe {
        state.orchestrator.probe().await
    } else {
        state.orchestrator.health().status()
    };

    Json(json!({
        "server": "online",
        "nova_ai": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
