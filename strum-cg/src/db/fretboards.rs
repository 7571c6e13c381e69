//! Fretboard cache namespace
//!
//! Keyed by sanitized chord name; same fail-open read and swallowed-write
//! policy as the chart namespace.

use crate::models::FretboardDiagram;
use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Fetch a cached fretboard diagram by sanitized chord key
pub async fn get_fretboard(pool: &SqlitePool, cache_key: &str) -> Option<FretboardDiagram> {
    let row = match sqlx::query("SELECT payload FROM fretboard_cache WHERE cache_key = ?")
        .bind(cache_key)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row?,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Fretboard cache read failed, treating as miss: {}", e);
            return None;
        }
    };

    let payload: String = row.get("payload");
    match serde_json::from_str(&payload) {
        Ok(diagram) => {
            tracing::debug!(cache_key = %cache_key, "Fretboard cache hit");
            Some(diagram)
        }
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Malformed cached fretboard, treating as miss: {}", e);
            None
        }
    }
}

/// Store a fretboard diagram, overwriting any existing entry
pub async fn put_fretboard(pool: &SqlitePool, cache_key: &str, diagram: &FretboardDiagram) {
    let payload = match serde_json::to_string(diagram) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Fretboard serialization failed, skipping cache write: {}", e);
            return;
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO fretboard_cache (cache_key, payload, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(cache_key) DO UPDATE SET
            payload = excluded.payload,
            created_at = excluded.created_at
        "#,
    )
    .bind(cache_key)
    .bind(&payload)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await;

    match result {
        Ok(_) => tracing::info!(cache_key = %cache_key, "Cached fretboard"),
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Fretboard cache write failed: {}", e);
        }
    }
}

/// Delete a fretboard entry
///
/// Idempotent: deleting an absent key succeeds. Storage errors propagate.
pub async fn delete_fretboard(pool: &SqlitePool, cache_key: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM fretboard_cache WHERE cache_key = ?")
        .bind(cache_key)
        .execute(pool)
        .await?;

    tracing::info!(
        cache_key = %cache_key,
        rows = result.rows_affected(),
        "Deleted cached fretboard"
    );

    Ok(())
}
