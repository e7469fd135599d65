use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Liveness endpoint with a couple of service-level numbers.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cached_players": state.cache.entry_count(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}
