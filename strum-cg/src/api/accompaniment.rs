//! Accompaniment advice endpoints

use crate::api::bearer_token;
use crate::error::ApiResult;
use crate::models::{AccompanimentText, ChordChart};
use crate::AppState;
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

/// Accompaniment request: the chart to advise on plus display names
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccompanimentRequest {
    pub song_name: String,
    pub artist_name: String,
    pub chords: ChordChart,
    #[serde(default)]
    pub arrangement_style: String,
    /// Bypass the cache and overwrite (admin only)
    #[serde(default)]
    pub force: bool,
}

/// Deletion request, addressing the entry by its chord set and style
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccompanimentRequest {
    pub unique_chords: Vec<String>,
    #[serde(default)]
    pub arrangement_style: String,
}

pub fn accompaniment_routes() -> Router<AppState> {
    Router::new().route(
        "/accompaniment",
        post(get_accompaniment).delete(delete_accompaniment),
    )
}

/// POST /accompaniment - get or generate playing advice for a chart
async fn get_accompaniment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AccompanimentRequest>,
) -> ApiResult<Json<AccompanimentText>> {
    let token = bearer_token(&headers);
    let text = state
        .orchestrator
        .get_or_generate_accompaniment(
            &request.song_name,
            &request.artist_name,
            &request.chords,
            &request.arrangement_style,
            request.force,
            token,
        )
        .await?;
    Ok(Json(text))
}

/// DELETE /accompaniment - remove cached advice (admin only)
async fn delete_accompaniment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteAccompanimentRequest>,
) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers);
    state
        .orchestrator
        .delete_accompaniment(&request.unique_chords, &request.arrangement_style, token)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}
