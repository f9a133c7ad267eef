//! Refresh Token Entry Value Object
//!
//! A refresh token recorded against a user. The server-side list is the
//! source of truth for single-use rotation: a token that is not on the
//! list is dead no matter what its signature says.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One issued refresh token with its issuance time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenEntry {
    /// The signed token string
    pub token: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
}

impl RefreshTokenEntry {
    /// Create an entry for a freshly issued token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
        }
    }

    /// Whether the entry has outlived the retention period
    pub fn is_expired(&self, retention: Duration, now: DateTime<Utc>) -> bool {
        now - self.issued_at > retention
    }
}
