//! Library index over the chart cache
//!
//! Read-only queries that treat cached charts as a browsable library: the
//! most recently generated songs, and token search against the metadata
//! captured at write time. Neither path consults the upstream catalog.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

/// One entry of the recency listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentChart {
    pub song_uri: String,
    pub arrangement_style: String,
}

/// List the most recently generated charts
///
/// Scans in descending creation order. A song appearing under several
/// arrangement styles is collapsed to its single most recent entry first;
/// the style filter then applies to that collapsed view, so a song whose
/// latest chart is a different style does not resurface through an older
/// entry. `max_count` bounds the filtered result.
pub async fn recent_charts(
    pool: &SqlitePool,
    max_count: usize,
    style_filter: Option<&str>,
) -> Result<Vec<RecentChart>> {
    let rows = sqlx::query(
        "SELECT song_uri, arrangement_style FROM chart_cache ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut seen: Vec<String> = Vec::new();
    let mut recent = Vec::new();
    for row in rows {
        let song_uri: String = row.get("song_uri");
        let arrangement_style: String = row.get("arrangement_style");

        if seen.contains(&song_uri) {
            continue;
        }
        seen.push(song_uri.clone());

        if let Some(filter) = style_filter {
            if arrangement_style != filter {
                continue;
            }
        }

        recent.push(RecentChart {
            song_uri,
            arrangement_style,
        });
        if recent.len() >= max_count {
            break;
        }
    }

    Ok(recent)
}

/// Search cached charts by track title or artist name
///
/// The lower-cased query must match one of the entry's search tokens
/// exactly; this is set membership, not substring search. Duplicate songs
/// collapse to one result, in recency order.
pub async fn search_charts(pool: &SqlitePool, query: &str) -> Result<Vec<String>> {
    let needle = query.to_lowercase();

    let rows = sqlx::query(
        "SELECT song_uri, search_tokens FROM chart_cache ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut matches: Vec<String> = Vec::new();
    for row in rows {
        let song_uri: String = row.get("song_uri");
        if matches.contains(&song_uri) {
            continue;
        }

        let tokens_json: String = row.get("search_tokens");
        let tokens: Vec<String> = serde_json::from_str(&tokens_json).unwrap_or_default();
        if tokens.iter().any(|token| *token == needle) {
            matches.push(song_uri);
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    async fn insert_chart(
        pool: &SqlitePool,
        cache_key: &str,
        song_uri: &str,
        style: &str,
        tokens: &[&str],
        created_at: i64,
    ) {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO chart_cache (
                cache_key, payload, song_uri, arrangement_style, search_tokens, created_at
            ) VALUES (?, '{"lines":[],"uniqueChords":[]}', ?, ?, ?, ?)
            "#,
        )
        .bind(cache_key)
        .bind(song_uri)
        .bind(style)
        .bind(serde_json::to_string(&tokens).unwrap())
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_recent_orders_by_creation_descending() {
        let pool = test_pool().await;
        insert_chart(&pool, "a", "spotify:track:a", "Standard", &[], 1).await;
        insert_chart(&pool, "b", "spotify:track:b", "Standard", &[], 2).await;
        insert_chart(&pool, "c", "spotify:track:c", "Standard", &[], 3).await;

        let recent = recent_charts(&pool, 10, None).await.unwrap();
        let uris: Vec<&str> = recent.iter().map(|r| r.song_uri.as_str()).collect();
        assert_eq!(uris, vec!["spotify:track:c", "spotify:track:b", "spotify:track:a"]);
    }

    #[tokio::test]
    async fn test_recent_truncates_to_max_count() {
        let pool = test_pool().await;
        insert_chart(&pool, "a", "spotify:track:a", "Standard", &[], 1).await;
        insert_chart(&pool, "b", "spotify:track:b", "Standard", &[], 2).await;
        insert_chart(&pool, "c", "spotify:track:c", "Standard", &[], 3).await;

        let recent = recent_charts(&pool, 2, None).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].song_uri, "spotify:track:c");
    }

    #[tokio::test]
    async fn test_recent_collapses_songs_before_style_filter() {
        // Song A at t=1 (Standard), B at t=2 (Standard), A again at t=3 (Pop).
        // A's most recent entry is Pop, so a Standard listing must contain
        // only B; the stale Standard entry for A must not resurface.
        let pool = test_pool().await;
        insert_chart(&pool, "a", "spotify:track:a", "Standard", &[], 1).await;
        insert_chart(&pool, "b", "spotify:track:b", "Standard", &[], 2).await;
        insert_chart(&pool, "a-Pop", "spotify:track:a", "Pop", &[], 3).await;

        let recent = recent_charts(&pool, 10, Some("Standard")).await.unwrap();
        assert_eq!(
            recent,
            vec![RecentChart {
                song_uri: "spotify:track:b".to_string(),
                arrangement_style: "Standard".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_search_is_exact_token_case_insensitive() {
        let pool = test_pool().await;
        insert_chart(
            &pool,
            "a",
            "spotify:track:a",
            "Standard",
            &["let it be", "the beatles"],
            1,
        )
        .await;

        let by_artist = search_charts(&pool, "The Beatles").await.unwrap();
        assert_eq!(by_artist, vec!["spotify:track:a"]);

        let by_title = search_charts(&pool, "let it be").await.unwrap();
        assert_eq!(by_title, vec!["spotify:track:a"]);

        // Membership, not substring
        assert!(search_charts(&pool, "beatles").await.unwrap().is_empty());
        assert!(search_charts(&pool, "abbey road").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_collapses_duplicate_songs() {
        let pool = test_pool().await;
        insert_chart(&pool, "a", "spotify:track:a", "Standard", &["the beatles"], 1).await;
        insert_chart(&pool, "a-Pop", "spotify:track:a", "Pop", &["the beatles"], 2).await;

        let matches = search_charts(&pool, "the beatles").await.unwrap();
        assert_eq!(matches, vec!["spotify:track:a"]);
    }
}
