//! strum-cg library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod db;
pub mod error;
pub mod keys;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use crate::services::{GenerationOrchestrator, YouTubeClient};
use crate::types::TrackMetadataSource;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (cache namespaces + sessions)
    pub db: SqlitePool,
    /// Get-or-generate policy over the cache and generators
    pub orchestrator: Arc<GenerationOrchestrator>,
    /// Track catalog used for search and row hydration
    pub metadata: Arc<dyn TrackMetadataSource>,
    /// Backing-video lookup; absent when no API key is configured
    pub video_search: Option<Arc<YouTubeClient>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        orchestrator: Arc<GenerationOrchestrator>,
        metadata: Arc<dyn TrackMetadataSource>,
        video_search: Option<Arc<YouTubeClient>>,
    ) -> Self {
        Self {
            db,
            orchestrator,
            metadata,
            video_search,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::chart_routes())
        .merge(api::fretboard_routes())
        .merge(api::accompaniment_routes())
        .merge(api::library_routes())
        .merge(api::video_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
