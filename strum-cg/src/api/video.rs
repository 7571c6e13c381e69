//! Backing-video lookup endpoint

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct VideoParams {
    pub song: String,
    pub artist: String,
}

pub fn video_routes() -> Router<AppState> {
    Router::new().route("/video", get(get_video))
}

/// GET /video?song=&artist= - find a backing video for playback
async fn get_video(
    State(state): State<AppState>,
    Query(params): Query<VideoParams>,
) -> ApiResult<Json<Value>> {
    let Some(client) = &state.video_search else {
        return Err(ApiError::Internal(
            "video search is not configured".to_string(),
        ));
    };

    let query = format!("{} {} official audio", params.song, params.artist);
    let video_id = client
        .search_video(&query)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match video_id {
        Some(video_id) => Ok(Json(json!({ "videoId": video_id }))),
        None => Err(ApiError::NotFound(
            "could not find a matching video".to_string(),
        )),
    }
}
