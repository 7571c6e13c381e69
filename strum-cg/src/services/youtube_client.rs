//! YouTube Data API client
//!
//! Single-purpose lookup: first matching video id for a song/artist query,
//! used by the player UI for backing audio.

use crate::types::MetadataError;
use serde::Deserialize;
use std::time::Duration;

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// YouTube Data API client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Result<Self, MetadataError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Search for the best-matching video, returning its id
    pub async fn search_video(&self, query: &str) -> Result<Option<String>, MetadataError> {
        let response = self
            .http_client
            .get(format!("{}/search", YOUTUBE_API_BASE_URL))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(status.as_u16(), error_text));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        let video_id = body.items.into_iter().next().and_then(|item| item.id.video_id);
        match &video_id {
            Some(id) => tracing::debug!(query = %query, video_id = %id, "Found video"),
            None => tracing::debug!(query = %query, "No video found"),
        }

        Ok(video_id)
    }
}
