//! Admin authorization gate
//!
//! Single predicate consumed before forced regeneration and deletion: does
//! the acting identity resolve to an allow-listed admin email. Any failure
//! to resolve denies; the gate never errors.

use crate::types::IdentityResolver;
use std::sync::Arc;

/// Admin allow-list check over an injected identity resolver
#[derive(Clone)]
pub struct AdminGate {
    resolver: Arc<dyn IdentityResolver>,
    admin_emails: Vec<String>,
}

impl AdminGate {
    pub fn new(resolver: Arc<dyn IdentityResolver>, admin_emails: Vec<String>) -> Self {
        Self {
            resolver,
            admin_emails,
        }
    }

    /// True iff the token resolves to an allow-listed email
    ///
    /// Missing token, unknown/expired session, resolver failure: all deny.
    pub async fn is_authorized(&self, token: Option<&str>) -> bool {
        let Some(token) = token else {
            tracing::debug!("Admin check without session token, denying");
            return false;
        };

        match self.resolver.resolve_email(token).await {
            Ok(Some(email)) => {
                let authorized = self
                    .admin_emails
                    .iter()
                    .any(|admin| admin.eq_ignore_ascii_case(&email));
                if !authorized {
                    tracing::warn!(email = %email, "Non-admin attempted a gated operation");
                }
                authorized
            }
            Ok(None) => {
                tracing::debug!("Session token did not resolve to an identity, denying");
                false
            }
            Err(e) => {
                tracing::warn!("Admin check failed, denying: {}", e);
                false
            }
        }
    }
}
