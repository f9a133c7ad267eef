//! Application Configuration
//!
//! Configuration for the Auth application layer. Every security policy
//! number lives here; domain code receives values, never reads env.

use chrono::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret shared by both token families
    pub signing_secret: String,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_token_ttl: Duration,
    /// bcrypt cost factor
    pub hash_cost: u32,
    /// Failures needed to lock an account
    pub lockout_threshold: u16,
    /// Sliding lockout window
    pub lockout_window: Duration,
    /// Server-side refresh token retention
    ///
    /// Matches the refresh token lifetime: an entry past this age can
    /// no longer verify anyway.
    pub refresh_retention: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            hash_cost: platform::password::DEFAULT_HASH_COST,
            lockout_threshold: 5,
            lockout_window: Duration::minutes(15),
            refresh_retention: Duration::days(7),
        }
    }
}

impl AuthConfig {
    /// Create config for development (fixed insecure secret)
    pub fn development() -> Self {
        Self {
            signing_secret: "your-secret-key".to_string(),
            ..Default::default()
        }
    }
}
