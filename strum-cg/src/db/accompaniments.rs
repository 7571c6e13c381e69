//! Accompaniment-text cache namespace

use crate::models::AccompanimentText;
use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Fetch cached accompaniment advice by sanitized key
pub async fn get_accompaniment(pool: &SqlitePool, cache_key: &str) -> Option<AccompanimentText> {
    let row = match sqlx::query("SELECT payload FROM accompaniment_cache WHERE cache_key = ?")
        .bind(cache_key)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row?,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Accompaniment cache read failed, treating as miss: {}", e);
            return None;
        }
    };

    let payload: String = row.get("payload");
    match serde_json::from_str(&payload) {
        Ok(text) => {
            tracing::debug!(cache_key = %cache_key, "Accompaniment cache hit");
            Some(text)
        }
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Malformed cached accompaniment, treating as miss: {}", e);
            None
        }
    }
}

/// Store accompaniment advice, overwriting any existing entry
pub async fn put_accompaniment(pool: &SqlitePool, cache_key: &str, text: &AccompanimentText) {
    let payload = match serde_json::to_string(text) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Accompaniment serialization failed, skipping cache write: {}", e);
            return;
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO accompaniment_cache (cache_key, payload, created_at)
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
        Ok(_) => tracing::info!(cache_key = %cache_key, "Cached accompaniment text"),
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Accompaniment cache write failed: {}", e);
        }
    }
}

/// Delete an accompaniment entry
///
/// Idempotent: deleting an absent key succeeds. Storage errors propagate.
pub async fn delete_accompaniment(pool: &SqlitePool, cache_key: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM accompaniment_cache WHERE cache_key = ?")
        .bind(cache_key)
        .execute(pool)
        .await?;

    tracing::info!(
        cache_key = %cache_key,
        rows = result.rows_affected(),
        "Deleted cached accompaniment text"
    );

    Ok(())
}
