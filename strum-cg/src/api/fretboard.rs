//! Fretboard diagram endpoints

use crate::api::bearer_token;
use crate::error::{ApiError, ApiResult};
use crate::models::FretboardDiagram;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Query parameters for fretboard lookup
///
/// Chord names arrive as a query parameter because slash chords ("C/G")
/// do not survive as path segments.
#[derive(Debug, Deserialize)]
pub struct FretboardParams {
    pub chord: String,
    /// Bypass the cache and overwrite (admin only)
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteFretboardParams {
    pub chord: String,
}

pub fn fretboard_routes() -> Router<AppState> {
    Router::new().route("/fretboard", get(get_fretboard).delete(delete_fretboard))
}

/// GET /fretboard?chord= - get or generate the fingering for a chord
async fn get_fretboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FretboardParams>,
) -> ApiResult<Json<FretboardDiagram>> {
    if params.chord.trim().is_empty() {
        return Err(ApiError::BadRequest("chord must not be empty".to_string()));
    }

    let token = bearer_token(&headers);
    let diagram = state
        .orchestrator
        .get_or_generate_fretboard(params.chord.trim(), params.force, token)
        .await?;
    Ok(Json(diagram))
}

/// DELETE /fretboard?chord= - remove a cached fingering (admin only)
async fn delete_fretboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteFretboardParams>,
) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers);
    state
        .orchestrator
        .delete_fretboard(params.chord.trim(), token)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}
