//! Get-or-generate orchestration
//!
//! One policy, applied independently per artifact kind: check the cache
//! unless a force flag is set, invoke the generator on a miss, post-process,
//! persist where the subject allows it, and return. Forced regeneration and
//! deletion pass the admin gate before anything else happens.
//!
//! Concurrent requests for the same key are not deduplicated; both may
//! generate and the later write wins. Cached artifacts are idempotently
//! regenerable, so the race is tolerated.

use crate::db;
use crate::keys;
use crate::models::{AccompanimentText, ChordChart, FretboardDiagram};
use crate::services::AdminGate;
use crate::types::{
    AccompanimentGenerator, ChartGenerator, FretboardGenerator, GeneratorError,
    TrackMetadataSource,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

/// Orchestration errors surfaced to the API layer
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Force/delete attempted by a non-admin identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Generator collaborator failed or returned an unusable payload
    #[error("Generation failed: {0}")]
    Generation(#[from] GeneratorError),

    /// Track metadata needed for generation could not be resolved
    #[error("Metadata resolution failed: {0}")]
    Metadata(String),

    /// Cache delete failed; deletion is user-visible and must report
    #[error("Cache delete failed: {0}")]
    CacheDelete(String),
}

/// Get-or-generate policy over the cache and the generator collaborators
pub struct GenerationOrchestrator {
    db: SqlitePool,
    chart_generator: Arc<dyn ChartGenerator>,
    fretboard_generator: Arc<dyn FretboardGenerator>,
    accompaniment_generator: Arc<dyn AccompanimentGenerator>,
    metadata: Arc<dyn TrackMetadataSource>,
    admin_gate: AdminGate,
}

impl GenerationOrchestrator {
    pub fn new(
        db: SqlitePool,
        chart_generator: Arc<dyn ChartGenerator>,
        fretboard_generator: Arc<dyn FretboardGenerator>,
        accompaniment_generator: Arc<dyn AccompanimentGenerator>,
        metadata: Arc<dyn TrackMetadataSource>,
        admin_gate: AdminGate,
    ) -> Self {
        Self {
            db,
            chart_generator,
            fretboard_generator,
            accompaniment_generator,
            metadata,
            admin_gate,
        }
    }

    /// Display name and artist for the generation prompt
    ///
    /// Catalog tracks resolve through the metadata collaborator; a track the
    /// catalog cannot resolve fails the whole generation. Local uploads use
    /// the filename.
    async fn display_names(&self, song_uri: &str) -> Result<(String, String), OrchestratorError> {
        if keys::is_catalog_uri(song_uri) {
            match self
                .metadata
                .resolve_track(song_uri)
                .await
                .map_err(|e| OrchestratorError::Metadata(e.to_string()))?
            {
                Some(track) => Ok((track.name, track.artists.join(", "))),
                None => Err(OrchestratorError::Metadata(format!(
                    "could not resolve track details for {song_uri}"
                ))),
            }
        } else if keys::is_local_uri(song_uri) {
            Ok((keys::local_display_name(song_uri), "Local File".to_string()))
        } else {
            Ok(("Unknown Song".to_string(), "Unknown Artist".to_string()))
        }
    }

    /// Get or generate the chord chart for a (song, arrangement style) pair
    ///
    /// `force` bypasses the cache read and overwrites the entry; it requires
    /// an admin session token, checked before any cache access. Charts are
    /// persisted only for catalog-backed songs; local uploads always
    /// regenerate.
    pub async fn get_or_generate_chart(
        &self,
        song_uri: &str,
        arrangement_style: &str,
        force: bool,
        session_token: Option<&str>,
    ) -> Result<ChordChart, OrchestratorError> {
        if force && !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can force-regenerate charts".to_string(),
            ));
        }

        let cache_key = keys::sanitize(&keys::chart_key(song_uri, arrangement_style));

        if !force {
            if let Some(chart) = db::charts::get_chart(&self.db, &cache_key).await {
                return Ok(chart);
            }
        }

        let (song_name, artist_name) = self.display_names(song_uri).await?;
        let style = keys::effective_style(arrangement_style);

        let mut chart = self
            .chart_generator
            .generate_chart(&song_name, &artist_name, style)
            .await?;

        // The generator's own unique-chord list is untrusted; the measures
        // are authoritative.
        chart.recompute_unique_chords();
        if chart.lines.is_empty() && chart.unique_chords.is_empty() {
            return Err(GeneratorError::InvalidResult(
                "chart contained no lines and no chords".to_string(),
            )
            .into());
        }

        if keys::is_catalog_uri(song_uri) {
            // Search tokens resolve at write time; a failed lookup caches the
            // chart without tokens rather than failing the write.
            let search_tokens = match self.metadata.resolve_track(song_uri).await {
                Ok(Some(track)) => keys::search_tokens(&track.name, &track.artists),
                Ok(None) => Vec::new(),
                Err(e) => {
                    tracing::warn!(song_uri = %song_uri, "Search token resolution failed, caching without tokens: {}", e);
                    Vec::new()
                }
            };
            db::charts::put_chart(
                &self.db,
                &cache_key,
                &chart,
                song_uri,
                style,
                &search_tokens,
            )
            .await;
        }

        Ok(chart)
    }

    /// Get or generate the fretboard diagram for a chord
    ///
    /// Fretboard entries persist regardless of which song asked for them;
    /// `force` regenerates and overwrites, gated like chart regeneration.
    pub async fn get_or_generate_fretboard(
        &self,
        chord: &str,
        force: bool,
        session_token: Option<&str>,
    ) -> Result<FretboardDiagram, OrchestratorError> {
        if force && !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can force-regenerate fretboards".to_string(),
            ));
        }

        let cache_key = keys::sanitize(&keys::fretboard_key(chord));

        if !force {
            if let Some(diagram) = db::fretboards::get_fretboard(&self.db, &cache_key).await {
                return Ok(diagram);
            }
        }

        let diagram = self.fretboard_generator.generate_fretboard(chord).await?;
        db::fretboards::put_fretboard(&self.db, &cache_key, &diagram).await;

        Ok(diagram)
    }

    /// Get or generate accompaniment advice for a chart
    ///
    /// A chart with no chords is unusable input; nothing is generated or
    /// cached for it.
    pub async fn get_or_generate_accompaniment(
        &self,
        song_name: &str,
        artist_name: &str,
        chart: &ChordChart,
        arrangement_style: &str,
        force: bool,
        session_token: Option<&str>,
    ) -> Result<AccompanimentText, OrchestratorError> {
        if force && !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can force-regenerate accompaniment advice".to_string(),
            ));
        }

        if chart.unique_chords.is_empty() {
            return Err(GeneratorError::InvalidResult(
                "chart has no chords to advise on".to_string(),
            )
            .into());
        }

        let cache_key = keys::sanitize(&keys::accompaniment_key(
            &chart.unique_chords,
            arrangement_style,
        ));

        if !force {
            if let Some(text) = db::accompaniments::get_accompaniment(&self.db, &cache_key).await {
                return Ok(text);
            }
        }

        let progression = chart.progression_text();
        let style = keys::effective_style(arrangement_style);
        let text = self
            .accompaniment_generator
            .generate_accompaniment(song_name, artist_name, &progression, style)
            .await?;
        db::accompaniments::put_accompaniment(&self.db, &cache_key, &text).await;

        Ok(text)
    }

    /// Delete the cached chart for a (song, arrangement style) pair
    ///
    /// Admin-gated; the gate is checked before the store is touched.
    pub async fn delete_chart(
        &self,
        song_uri: &str,
        arrangement_style: &str,
        session_token: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        if !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can delete cached charts".to_string(),
            ));
        }

        let cache_key = keys::sanitize(&keys::chart_key(song_uri, arrangement_style));
        db::charts::delete_chart(&self.db, &cache_key)
            .await
            .map_err(|e| OrchestratorError::CacheDelete(e.to_string()))
    }

    /// Delete the cached fretboard for a chord (admin-gated)
    pub async fn delete_fretboard(
        &self,
        chord: &str,
        session_token: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        if !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can delete cached fretboards".to_string(),
            ));
        }

        let cache_key = keys::sanitize(&keys::fretboard_key(chord));
        db::fretboards::delete_fretboard(&self.db, &cache_key)
            .await
            .map_err(|e| OrchestratorError::CacheDelete(e.to_string()))
    }

    /// Delete the cached accompaniment for a chord set and style (admin-gated)
    pub async fn delete_accompaniment(
        &self,
        unique_chords: &[String],
        arrangement_style: &str,
        session_token: Option<&str>,
    ) -> Result<(), OrchestratorError> {
        if !self.admin_gate.is_authorized(session_token).await {
            return Err(OrchestratorError::Unauthorized(
                "only admins can delete cached accompaniment advice".to_string(),
            ));
        }

        let cache_key = keys::sanitize(&keys::accompaniment_key(unique_chords, arrangement_style));
        db::accompaniments::delete_accompaniment(&self.db, &cache_key)
            .await
            .map_err(|e| OrchestratorError::CacheDelete(e.to_string()))
    }
}
