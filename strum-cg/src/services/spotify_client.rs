//! Spotify Web API client
//!
//! Client-credentials flow; the bearer token is cached with its expiry and
//! refreshed on demand. The client is constructed once at startup and
//! injected wherever track metadata is needed.

use crate::models::TrackDetails;
use crate::types::{MetadataError, TrackMetadataSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const PLACEHOLDER_ART_URL: &str = "https://picsum.photos/100";

// Refresh slightly early so a token never expires mid-request
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    uri: String,
    name: String,
    artists: Vec<ArtistObject>,
    album: AlbumObject,
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    name: String,
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TracksPage>,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    items: Vec<TrackObject>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, MetadataError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            token: Mutex::new(None),
        })
    }

    /// Current access token, refreshed via client-credentials when missing
    /// or near expiry
    async fn access_token(&self) -> Result<String, MetadataError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Spotify client-credentials token");
        let response = self
            .http_client
            .post(SPOTIFY_TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        let lifetime = token
            .expires_in
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .max(1);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(token.access_token)
    }

    /// Drop the cached token after an authorization failure
    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    fn to_details(track: TrackObject) -> TrackDetails {
        TrackDetails {
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
            art: track
                .album
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_else(|| PLACEHOLDER_ART_URL.to_string()),
            preview_url: track.preview_url,
        }
    }

    /// Look up one track by URI
    ///
    /// Non-Spotify URIs and unknown ids resolve to `None`.
    pub async fn get_track(&self, uri: &str) -> Result<Option<TrackDetails>, MetadataError> {
        if !crate::keys::is_catalog_uri(uri) {
            return Ok(None);
        }
        let Some(track_id) = uri.rsplit(':').next().filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let url = format!("{}/tracks/{}", SPOTIFY_API_BASE_URL, track_id);
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();
        if status == 400 || status == 404 {
            tracing::debug!(uri = %uri, "Track not found in catalog");
            return Ok(None);
        }
        if status == 401 {
            self.invalidate_token().await;
            return Err(MetadataError::Api(401, "access token rejected".to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(status.as_u16(), error_text));
        }

        let track: TrackObject = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        tracing::debug!(uri = %uri, name = %track.name, "Resolved track details");
        Ok(Some(Self::to_details(track)))
    }

    /// Search the catalog, returning up to 10 tracks
    pub async fn search(&self, query: &str) -> Result<Vec<TrackDetails>, MetadataError> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(format!("{}/search", SPOTIFY_API_BASE_URL))
            .bearer_auth(&token)
            .query(&[("q", query), ("type", "track"), ("limit", "10")])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 {
            self.invalidate_token().await;
            return Err(MetadataError::Api(401, "access token rejected".to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(status.as_u16(), error_text));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        let results: Vec<TrackDetails> = body
            .tracks
            .map(|page| page.items.into_iter().map(Self::to_details).collect())
            .unwrap_or_default();

        tracing::debug!(query = %query, count = results.len(), "Catalog search complete");
        Ok(results)
    }
}

#[async_trait]
impl TrackMetadataSource for SpotifyClient {
    async fn resolve_track(&self, uri: &str) -> Result<Option<TrackDetails>, MetadataError> {
        self.get_track(uri).await
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackDetails>, MetadataError> {
        self.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_catalog_uri_resolves_to_none() {
        let client = SpotifyClient::new("id".to_string(), "secret".to_string()).unwrap();
        let resolved = client.get_track("local:file:song.mp3").await.unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_track_mapping_falls_back_to_placeholder_art() {
        let track = TrackObject {
            uri: "spotify:track:abc".to_string(),
            name: "Song".to_string(),
            artists: vec![ArtistObject {
                name: "Artist".to_string(),
            }],
            album: AlbumObject {
                name: "Album".to_string(),
                images: vec![],
            },
            preview_url: None,
        };

        let details = SpotifyClient::to_details(track);
        assert_eq!(details.art, PLACEHOLDER_ART_URL);
        assert_eq!(details.artists, vec!["Artist"]);
    }
}
