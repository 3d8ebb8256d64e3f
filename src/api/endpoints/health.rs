//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub active_sessions: usize,
    pub version: &'static str,
}

/// `GET /api/health` — connection check for the front-end.
pub async fn check(State(core): State<Arc<CoreState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: core.model.clone(),
        active_sessions: core.session_count(),
        version: crate::config::APP_VERSION,
    })
}
