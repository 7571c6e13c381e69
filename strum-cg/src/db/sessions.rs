//! Session token store
//!
//! Maps opaque session tokens to verified emails for the admin gate. Token
//! issuance happens outside this service; this module only resolves and
//! honors expiry.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Resolve a session token to its email
///
/// Unknown tokens and expired sessions resolve to `None`. A row whose
/// `expires_at` cannot be parsed is treated as expired.
pub async fn resolve_session_email(pool: &SqlitePool, token: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT email, expires_at FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let email: String = row.get("email");
    let expires_at: Option<String> = row.get("expires_at");

    if let Some(expires_at) = expires_at {
        match DateTime::parse_from_rfc3339(&expires_at) {
            Ok(expiry) if expiry.with_timezone(&Utc) <= Utc::now() => {
                tracing::debug!("Session expired at {}", expires_at);
                return Ok(None);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Unparseable session expiry {:?}, treating as expired: {}", expires_at, e);
                return Ok(None);
            }
        }
    }

    Ok(Some(email))
}

/// Insert or refresh a session row (used by operational tooling and tests)
pub async fn upsert_session(
    pool: &SqlitePool,
    token: &str,
    email: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, email, expires_at)
        VALUES (?, ?, ?)
        ON CONFLICT(token) DO UPDATE SET
            email = excluded.email,
            expires_at = excluded.expires_at
        "#,
    )
    .bind(token)
    .bind(email)
    .bind(expires_at.map(|t| t.to_rfc3339()))
    .execute(pool)
    .await?;

    Ok(())
}
