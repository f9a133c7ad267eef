//! User Entity
//!
//! The user aggregate: profile, credentials, failure counters and the
//! server-side refresh token list. Persisted and updated as one record,
//! so concurrent writers are last-writer-wins by design of the store.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, refresh_token::RefreshTokenEntry, user_id::UserId,
    user_password::UserPassword, user_role::Role,
};

/// Account state derived at login time
///
/// Lockout is checked before deactivation; a deactivated account that is
/// also locked reports locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Active,
    Locked,
    Inactive,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Login identifier (unique, lower-cased)
    pub email: Email,
    /// Display name
    pub display_name: DisplayName,
    /// Hashed password
    pub password_hash: UserPassword,
    /// Role (User, Manager, Admin)
    pub role: Role,
    /// Whether the account may log in at all
    pub is_active: bool,
    /// Consecutive login failure count
    pub failed_attempts: u16,
    /// Last login failure time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Source address of the last successful login
    pub last_login_ip: Option<String>,
    /// Currently valid refresh tokens
    pub refresh_tokens: Vec<RefreshTokenEntry>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with the default role
    pub fn new(email: Email, display_name: DisplayName, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            display_name,
            password_hash,
            role: Role::default(),
            is_active: true,
            failed_attempts: 0,
            last_failed_at: None,
            last_login_at: None,
            last_login_ip: None,
            refresh_tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account is locked under a sliding window policy
    ///
    /// Locked while the failure count has reached `threshold` and the
    /// most recent failure is younger than `window`. The state is derived
    /// from the counters, never stored, so expiry needs no background job.
    pub fn is_locked(&self, threshold: u16, window: Duration) -> bool {
        if self.failed_attempts < threshold {
            return false;
        }
        match self.last_failed_at {
            Some(last) => Utc::now() - last < window,
            None => false,
        }
    }

    /// Derive the account state checked at login
    pub fn state(&self, threshold: u16, window: Duration) -> AccountState {
        if self.is_locked(threshold, window) {
            AccountState::Locked
        } else if !self.is_active {
            AccountState::Inactive
        } else {
            AccountState::Active
        }
    }

    /// Record a failed login attempt
    ///
    /// The count only ever goes up; a single failure after a lapsed
    /// window re-locks an account that already reached the threshold.
    /// Only a successful login resets it, via `reset_failures`.
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.last_failed_at = Some(now);
        self.updated_at = now;
    }

    /// Reset login failure counters on successful login
    pub fn reset_failures(&mut self) {
        self.failed_attempts = 0;
        self.last_failed_at = None;
        self.updated_at = Utc::now();
    }

    /// Record successful login metadata
    pub fn record_login(&mut self, source_address: impl Into<String>) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.last_login_ip = Some(source_address.into());
        self.updated_at = now;
    }

    /// Whether the given refresh token is on the server-side list
    pub fn has_refresh_token(&self, token: &str) -> bool {
        self.refresh_tokens.iter().any(|e| e.token == token)
    }

    /// Add a freshly issued refresh token
    ///
    /// Idempotent: a token value already on the list is not duplicated.
    pub fn add_refresh_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.has_refresh_token(&token) {
            self.refresh_tokens.push(RefreshTokenEntry::new(token));
            self.updated_at = Utc::now();
        }
    }

    /// Remove a refresh token from the list
    ///
    /// Returns whether the token was present.
    pub fn remove_refresh_token(&mut self, token: &str) -> bool {
        let before = self.refresh_tokens.len();
        self.refresh_tokens.retain(|e| e.token != token);
        let removed = self.refresh_tokens.len() < before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Drop refresh tokens that have outlived the retention period
    pub fn prune_expired_tokens(&mut self, retention: Duration) -> usize {
        let now = Utc::now();
        let before = self.refresh_tokens.len();
        self.refresh_tokens.retain(|e| !e.is_expired(retention, now));
        let pruned = before - self.refresh_tokens.len();
        if pruned > 0 {
            self.updated_at = Utc::now();
        }
        pruned
    }

    /// Revoke every refresh token (forced logout everywhere)
    pub fn clear_refresh_tokens(&mut self) {
        self.refresh_tokens.clear();
        self.updated_at = Utc::now();
    }

    /// Update role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Activate or deactivate the account
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }

    /// Update display name
    pub fn set_display_name(&mut self, display_name: DisplayName) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};
    use platform::password::BcryptHasher;

    fn test_user() -> User {
        let hasher = BcryptHasher::new(4);
        let raw = RawPassword::new("Password1".to_string()).unwrap();
        User::new(
            Email::new("alice@example.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
            UserPassword::from_raw(&raw, &hasher).unwrap(),
        )
    }

    #[test]
    fn test_lockout_requires_threshold() {
        let mut user = test_user();
        let window = Duration::minutes(15);

        for _ in 0..4 {
            user.record_failure();
        }
        assert!(!user.is_locked(5, window));

        user.record_failure();
        assert!(user.is_locked(5, window));
        assert_eq!(user.state(5, window), AccountState::Locked);
    }

    #[test]
    fn test_lockout_expires_with_window() {
        let mut user = test_user();
        let window = Duration::minutes(15);

        for _ in 0..5 {
            user.record_failure();
        }
        // Age the last failure past the window
        user.last_failed_at = Some(Utc::now() - Duration::minutes(16));
        assert!(!user.is_locked(5, window));
    }

    #[test]
    fn test_failure_after_lapsed_window_relocks() {
        let mut user = test_user();
        let window = Duration::minutes(15);

        for _ in 0..5 {
            user.record_failure();
        }
        user.last_failed_at = Some(Utc::now() - Duration::minutes(20));
        assert!(!user.is_locked(5, window));

        // One more wrong password re-locks immediately; the count never
        // resets on failure
        user.record_failure();
        assert_eq!(user.failed_attempts, 6);
        assert!(user.is_locked(5, window));
    }

    #[test]
    fn test_locked_wins_over_inactive() {
        let mut user = test_user();
        let window = Duration::minutes(15);
        user.set_active(false);

        assert_eq!(user.state(5, window), AccountState::Inactive);

        for _ in 0..5 {
            user.record_failure();
        }
        assert_eq!(user.state(5, window), AccountState::Locked);
    }

    #[test]
    fn test_refresh_token_list() {
        let mut user = test_user();

        user.add_refresh_token("tok-a");
        user.add_refresh_token("tok-b");
        user.add_refresh_token("tok-a"); // Duplicate ignored
        assert_eq!(user.refresh_tokens.len(), 2);

        assert!(user.remove_refresh_token("tok-a"));
        assert!(!user.remove_refresh_token("tok-a"));
        assert!(user.has_refresh_token("tok-b"));
    }

    #[test]
    fn test_prune_expired_tokens() {
        let mut user = test_user();
        user.add_refresh_token("old");
        user.add_refresh_token("fresh");
        user.refresh_tokens[0].issued_at = Utc::now() - Duration::days(8);

        let pruned = user.prune_expired_tokens(Duration::days(7));
        assert_eq!(pruned, 1);
        assert!(user.has_refresh_token("fresh"));
        assert!(!user.has_refresh_token("old"));
    }
}
