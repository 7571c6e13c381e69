//! Chord chart endpoints

use crate::api::bearer_token;
use crate::error::ApiResult;
use crate::models::ChordChart;
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Chart generation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordsRequest {
    /// Catalog URI or local-upload identifier
    pub song_uri: String,
    /// Arrangement style; empty means the default
    #[serde(default)]
    pub arrangement_style: String,
    /// Bypass the cache and overwrite (admin only)
    #[serde(default)]
    pub force: bool,
}

/// Chart deletion request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChordsRequest {
    pub song_uri: String,
    #[serde(default)]
    pub arrangement_style: String,
}

pub fn chart_routes() -> Router<AppState> {
    Router::new().route("/chords", post(generate_chords).delete(delete_chords))
}

/// POST /chords - get or generate the chart for a song
async fn generate_chords(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChordsRequest>,
) -> ApiResult<Json<ChordChart>> {
    let token = bearer_token(&headers);
    let chart = state
        .orchestrator
        .get_or_generate_chart(
            &request.song_uri,
            &request.arrangement_style,
            request.force,
            token,
        )
        .await?;
    Ok(Json(chart))
}

/// DELETE /chords - remove a cached chart (admin only)
async fn delete_chords(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteChordsRequest>,
) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers);
    state
        .orchestrator
        .delete_chart(&request.song_uri, &request.arrangement_style, token)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}
