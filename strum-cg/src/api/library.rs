//! Library and search endpoints
//!
//! The library views read the cache's own index, so previously generated
//! songs browse and search without touching the upstream catalog; only row
//! hydration (title, artist, art) calls out, and a row whose hydration
//! fails is dropped rather than failing the listing.

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::keys;
use crate::models::TrackSummary;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

/// Rows shown in the default library view
const RECENT_LIBRARY_ROWS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// Arrangement style filter; empty means the default style
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Deserialize)]
pub struct LibrarySearchParams {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSearchParams {
    pub q: String,
    #[serde(default)]
    pub style: String,
}

pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/library/recent", get(recent_library))
        .route("/library/search", get(search_library))
        .route("/search", get(search_catalog))
}

/// Hydrate song URIs into display rows via the metadata collaborator
///
/// Lookups fan out concurrently; a failed or unresolvable row is logged and
/// dropped, preserving the relative order of the rest.
async fn hydrate_rows(state: &AppState, song_uris: Vec<String>) -> Vec<TrackSummary> {
    let lookups = song_uris.iter().map(|uri| state.metadata.resolve_track(uri));
    let resolved = futures::future::join_all(lookups).await;

    song_uris
        .into_iter()
        .zip(resolved)
        .filter_map(|(uri, result)| match result {
            Ok(Some(track)) => Some(TrackSummary {
                uri: track.uri,
                name: track.name,
                artist: track.artists.join(", "),
                art: track.art,
                preview_url: track.preview_url,
                is_generated: true,
            }),
            Ok(None) => {
                tracing::warn!(uri = %uri, "Track no longer resolvable, dropping row");
                None
            }
            Err(e) => {
                tracing::warn!(uri = %uri, "Row hydration failed, dropping row: {}", e);
                None
            }
        })
        .collect()
}

/// GET /library/recent?style= - most recently generated songs for a style
async fn recent_library(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> ApiResult<Json<Vec<TrackSummary>>> {
    let style = keys::effective_style(&params.style);
    let recent = db::index::recent_charts(&state.db, RECENT_LIBRARY_ROWS, Some(style))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let song_uris = recent.into_iter().map(|r| r.song_uri).collect();
    Ok(Json(hydrate_rows(&state, song_uris).await))
}

/// GET /library/search?q= - search previously generated songs by title/artist
async fn search_library(
    State(state): State<AppState>,
    Query(params): Query<LibrarySearchParams>,
) -> ApiResult<Json<Vec<TrackSummary>>> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let song_uris = db::index::search_charts(&state.db, params.q.trim())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(hydrate_rows(&state, song_uris).await))
}

/// GET /search?q=&style= - catalog search annotated with generation status
async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogSearchParams>,
) -> ApiResult<Json<Vec<TrackSummary>>> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let tracks = state
        .metadata
        .search_tracks(params.q.trim())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut rows = Vec::with_capacity(tracks.len());
    for track in tracks {
        let cache_key = keys::sanitize(&keys::chart_key(&track.uri, &params.style));
        let is_generated = db::charts::chart_exists(&state.db, &cache_key).await;
        rows.push(TrackSummary {
            uri: track.uri,
            name: track.name,
            artist: track.artists.join(", "),
            art: track.art,
            preview_url: track.preview_url,
            is_generated,
        });
    }

    Ok(Json(rows))
}
