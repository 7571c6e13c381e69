//! HTTP API for strum-cg
//!
//! Thin handlers over the orchestrator and library index; request/response
//! bodies use camelCase JSON.

pub mod accompaniment;
pub mod charts;
pub mod fretboard;
pub mod health;
pub mod library;
pub mod video;

pub use accompaniment::accompaniment_routes;
pub use charts::chart_routes;
pub use fretboard::fretboard_routes;
pub use health::health_routes;
pub use library::library_routes;
pub use video::video_routes;

use axum::http::{header, HeaderMap};

/// Extract the bearer token from the Authorization header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer session-token"),
        );
        assert_eq!(bearer_token(&headers), Some("session-token"));
    }

    #[test]
    fn test_missing_and_malformed_headers_yield_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}
