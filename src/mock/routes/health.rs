//! Health Route
//!
//! - GET /health - Status, version and uptime (outside the `/api/v1` prefix)

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::client::HealthStatus;
use crate::mock::state::MockState;

/// GET /health
pub async fn health(State(state): State<Arc<MockState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        uptime_seconds: Some(state.uptime_seconds()),
    })
}
