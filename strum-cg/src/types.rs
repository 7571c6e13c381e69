//! Collaborator traits for the chart generator service
//!
//! The orchestrator depends on these seams rather than on concrete clients:
//! the generative model behind the three generator traits, the track catalog
//! behind [`TrackMetadataSource`], and the session verifier behind
//! [`IdentityResolver`]. Production wires in the Gemini and Spotify clients;
//! tests inject stubs.

use crate::models::{AccompanimentText, ChordChart, FretboardDiagram, TrackDetails};
use async_trait::async_trait;
use thiserror::Error;

/// Generator collaborator errors
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream API error
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse the model response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Model returned a structurally valid but unusable result
    #[error("Unusable result: {0}")]
    InvalidResult(String),
}

/// Track catalog collaborator errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// Client missing credentials or disabled at startup
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Identity resolution errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Session lookup failed: {0}")]
    Lookup(String),
}

/// Chord chart generation for one (song, artist, style) request
#[async_trait]
pub trait ChartGenerator: Send + Sync {
    async fn generate_chart(
        &self,
        song_name: &str,
        artist_name: &str,
        arrangement_style: &str,
    ) -> Result<ChordChart, GeneratorError>;
}

/// Fretboard fingering generation for one chord name
#[async_trait]
pub trait FretboardGenerator: Send + Sync {
    async fn generate_fretboard(&self, chord: &str) -> Result<FretboardDiagram, GeneratorError>;
}

/// Accompaniment advice generation for one chord progression
#[async_trait]
pub trait AccompanimentGenerator: Send + Sync {
    async fn generate_accompaniment(
        &self,
        song_name: &str,
        artist_name: &str,
        progression: &str,
        arrangement_style: &str,
    ) -> Result<AccompanimentText, GeneratorError>;
}

/// Track catalog lookups
#[async_trait]
pub trait TrackMetadataSource: Send + Sync {
    /// Resolve one track URI to its details
    ///
    /// Unknown or invalid URIs resolve to `Ok(None)`, never an error.
    async fn resolve_track(&self, uri: &str) -> Result<Option<TrackDetails>, MetadataError>;

    /// Search the catalog by free-text query
    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackDetails>, MetadataError>;
}

/// Opaque-token identity resolution, consumed only by the admin gate
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a session token to a verified email
    ///
    /// Unknown and expired tokens resolve to `Ok(None)`.
    async fn resolve_email(&self, token: &str) -> Result<Option<String>, IdentityError>;
}
