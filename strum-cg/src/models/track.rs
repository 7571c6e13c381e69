//! Catalog track models

use serde::{Deserialize, Serialize};

/// Track details resolved from the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetails {
    /// Catalog URI (e.g. "spotify:track:4u7EnebtmKWzUH433cf5Qv")
    pub uri: String,
    /// Track title
    pub name: String,
    /// Artist names in credit order
    pub artists: Vec<String>,
    /// Album title
    pub album: String,
    /// Album art URL
    pub art: String,
    /// 30-second preview URL, when the catalog provides one
    pub preview_url: Option<String>,
}

/// One library or search result row for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub uri: String,
    pub name: String,
    /// Artist names joined with ", "
    pub artist: String,
    pub art: String,
    pub preview_url: Option<String>,
    /// Whether a chart is already cached for this track
    pub is_generated: bool,
}
