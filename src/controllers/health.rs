use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use super::{stats::StatsController, tts::TtsController};

/// Shared state for the readiness probe
#[derive(Clone)]
pub struct HealthState {
    pub tts: Arc<TtsController>,
    pub stats: Arc<StatsController>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    let engines = state.tts.engine_names();
    let counter_store = state.stats.counter_store();

    if engines.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "engines": engines,
                "counter_store": counter_store
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "engines": engines,
                "counter_store": counter_store
            })),
        )
    }
}
