//! Chart cache namespace
//!
//! Read failures degrade to a cache miss and write failures are swallowed,
//! so cache trouble regenerates rather than erroring; deletes are the one
//! operation whose failure the caller must see.

use crate::models::ChordChart;
use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Fetch a cached chart by sanitized key
///
/// Storage errors and malformed payloads are logged and reported as a miss.
/// The creation timestamp is bookkeeping for the recency index and is never
/// part of the returned document.
pub async fn get_chart(pool: &SqlitePool, cache_key: &str) -> Option<ChordChart> {
    let row = match sqlx::query("SELECT payload FROM chart_cache WHERE cache_key = ?")
        .bind(cache_key)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row?,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Chart cache read failed, treating as miss: {}", e);
            return None;
        }
    };

    let payload: String = row.get("payload");
    match serde_json::from_str(&payload) {
        Ok(chart) => {
            tracing::debug!(cache_key = %cache_key, "Chart cache hit");
            Some(chart)
        }
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Malformed cached chart, treating as miss: {}", e);
            None
        }
    }
}

/// Store a chart, overwriting any existing entry for the key
///
/// Overwrite refreshes the creation time so a forced regeneration counts as
/// the most recent entry. Write failures are logged and swallowed; the
/// freshly generated chart is still returned to the caller.
pub async fn put_chart(
    pool: &SqlitePool,
    cache_key: &str,
    chart: &ChordChart,
    song_uri: &str,
    arrangement_style: &str,
    search_tokens: &[String],
) {
    let payload = match serde_json::to_string(chart) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Chart serialization failed, skipping cache write: {}", e);
            return;
        }
    };
    let tokens_json =
        serde_json::to_string(search_tokens).unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        r#"
        INSERT INTO chart_cache (
            cache_key, payload, song_uri, arrangement_style, search_tokens, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(cache_key) DO UPDATE SET
            payload = excluded.payload,
            song_uri = excluded.song_uri,
            arrangement_style = excluded.arrangement_style,
            search_tokens = excluded.search_tokens,
            created_at = excluded.created_at
        "#,
    )
    .bind(cache_key)
    .bind(&payload)
    .bind(song_uri)
    .bind(arrangement_style)
    .bind(&tokens_json)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            tracing::info!(cache_key = %cache_key, song_uri = %song_uri, "Cached chart");
        }
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Chart cache write failed: {}", e);
        }
    }
}

/// Check whether a chart entry exists without fetching the payload
///
/// Used to annotate search results as already generated. Storage errors are
/// logged and reported as absent.
pub async fn chart_exists(pool: &SqlitePool, cache_key: &str) -> bool {
    match sqlx::query("SELECT 1 FROM chart_cache WHERE cache_key = ?")
        .bind(cache_key)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row.is_some(),
        Err(e) => {
            tracing::error!(cache_key = %cache_key, "Chart existence check failed: {}", e);
            false
        }
    }
}

/// Delete a chart entry
///
/// Idempotent: deleting an absent key succeeds. Storage errors propagate;
/// deletion is a deliberate admin action and must report failure.
pub async fn delete_chart(pool: &SqlitePool, cache_key: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM chart_cache WHERE cache_key = ?")
        .bind(cache_key)
        .execute(pool)
        .await?;

    tracing::info!(
        cache_key = %cache_key,
        rows = result.rows_affected(),
        "Deleted cached chart"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartLine, Measure};

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    fn sample_chart() -> ChordChart {
        ChordChart {
            lines: vec![ChartLine {
                lyrics: "When I find myself in times of trouble".to_string(),
                start_time: 12.5,
                measures: vec![
                    Measure {
                        chords: "C".to_string(),
                        start_time: 12.5,
                    },
                    Measure {
                        chords: "G Am".to_string(),
                        start_time: 14.0,
                    },
                ],
            }],
            unique_chords: vec!["C".to_string(), "G".to_string(), "Am".to_string()],
        }
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let pool = test_pool().await;
        let chart = sample_chart();

        put_chart(
            &pool,
            "spotify-track-abc",
            &chart,
            "spotify:track:abc",
            "Standard",
            &["let it be".to_string(), "the beatles".to_string()],
        )
        .await;

        let loaded = get_chart(&pool, "spotify-track-abc").await.unwrap();
        assert_eq!(loaded, chart);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let pool = test_pool().await;
        assert!(get_chart(&pool, "absent").await.is_none());
    }

    #[tokio::test]
    async fn test_stored_payload_carries_no_timestamp() {
        let pool = test_pool().await;
        put_chart(
            &pool,
            "key",
            &sample_chart(),
            "spotify:track:abc",
            "Standard",
            &[],
        )
        .await;

        let payload: String = sqlx::query("SELECT payload FROM chart_cache WHERE cache_key = ?")
            .bind("key")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("payload");
        let document: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert!(document.get("createdAt").is_none());
        assert!(document.get("created_at").is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let pool = test_pool().await;
        let first = sample_chart();
        let mut second = sample_chart();
        second.unique_chords = vec!["Em".to_string()];

        put_chart(&pool, "key", &first, "spotify:track:abc", "Standard", &[]).await;
        put_chart(&pool, "key", &second, "spotify:track:abc", "Standard", &[]).await;

        let loaded = get_chart(&pool, "key").await.unwrap();
        assert_eq!(loaded.unique_chords, vec!["Em"]);
    }

    #[tokio::test]
    async fn test_malformed_payload_reads_as_miss() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO chart_cache (cache_key, payload, song_uri, arrangement_style, search_tokens, created_at) VALUES (?, ?, ?, ?, '[]', 0)",
        )
        .bind("bad")
        .bind("{not json")
        .bind("spotify:track:abc")
        .bind("Standard")
        .execute(&pool)
        .await
        .unwrap();

        assert!(get_chart(&pool, "bad").await.is_none());
    }

    #[tokio::test]
    async fn test_exists_reflects_put_and_delete() {
        let pool = test_pool().await;
        assert!(!chart_exists(&pool, "key").await);

        put_chart(&pool, "key", &sample_chart(), "spotify:track:abc", "Standard", &[]).await;
        assert!(chart_exists(&pool, "key").await);

        delete_chart(&pool, "key").await.unwrap();
        assert!(!chart_exists(&pool, "key").await);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let pool = test_pool().await;
        assert!(delete_chart(&pool, "never-existed").await.is_ok());
    }
}
