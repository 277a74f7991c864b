//! Personal access tokens.
//!
//! Only the SHA-256 hash of a token is stored. The plaintext is handed to the
//! client once, at issuance.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// An issued bearer token as persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    /// Label of the issuing flow ("api-token")
    pub name: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token without a TTL never expires; otherwise it expires `ttl` after issuance.
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        ttl.and_then(|ttl| self.created_at.checked_add_signed(ttl))
            .is_some_and(|expires_at| expires_at <= now)
    }
}
