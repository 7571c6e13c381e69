//! Health endpoint

use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health - liveness probe, no auth
async fn health(State(state): State<AppState>) -> Json<Value> {
    let uptime_seconds = (Utc::now() - state.startup_time).num_seconds();
    Json(json!({
        "status": "ok",
        "module": "strum-cg",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_seconds,
    }))
}
