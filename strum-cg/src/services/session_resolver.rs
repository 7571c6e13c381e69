//! Database-backed identity resolver

use crate::db;
use crate::types::{IdentityError, IdentityResolver};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Identity resolver over the sessions table
pub struct DbSessionResolver {
    db: SqlitePool,
}

impl DbSessionResolver {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityResolver for DbSessionResolver {
    async fn resolve_email(&self, token: &str) -> Result<Option<String>, IdentityError> {
        db::sessions::resolve_session_email(&self.db, token)
            .await
            .map_err(|e| IdentityError::Lookup(e.to_string()))
    }
}
