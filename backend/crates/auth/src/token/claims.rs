//! Token Claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;

/// Issuer stamped into every token
pub const ISSUER: &str = "admin-dashboard-rbac";

/// Audience claim for access tokens
const ACCESS_AUDIENCE: &str = "admin-dashboard-users";

/// Audience claim for refresh tokens
const REFRESH_AUDIENCE: &str = "admin-dashboard-refresh";

/// The two token families
///
/// Verification always names the expected kind; a refresh token
/// presented where an access token is expected fails on the audience
/// check even though the signature is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    #[inline]
    pub const fn audience(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_AUDIENCE,
            TokenKind::Refresh => REFRESH_AUDIENCE,
        }
    }
}

/// JWT claim set
///
/// Access tokens carry `email` and `role`; refresh tokens carry only
/// the subject plus a `jti` salt so two refreshes issued in the same
/// second still rotate to a distinct token string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build access token claims for a user
    pub fn access(user: &User, ttl: chrono::Duration, now: DateTime<Utc>) -> Self {
        Self {
            sub: user.user_id.to_string(),
            email: Some(user.email.as_str().to_string()),
            role: Some(user.role.code().to_string()),
            jti: None,
            iss: ISSUER.to_string(),
            aud: TokenKind::Access.audience().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Build refresh token claims for a user
    pub fn refresh(user: &User, ttl: chrono::Duration, now: DateTime<Utc>) -> Self {
        Self {
            sub: user.user_id.to_string(),
            email: None,
            role: None,
            jti: Some(uuid::Uuid::new_v4().to_string()),
            iss: ISSUER.to_string(),
            aud: TokenKind::Refresh.audience().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Parse the subject claim into a typed user ID
    pub fn subject(&self) -> Result<UserId, uuid::Error> {
        self.sub.parse()
    }
}
