//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::audit::entry::{AuditEntry, AuditFilter};
use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// Aggregate counts over the audit trail, by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditStats {
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    pub warning: i64,
}

/// User repository trait
///
/// The user record is read and written whole; concurrent updates to the
/// same user are last-writer-wins.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; fails with `DuplicateEmail` on an email collision
    async fn insert(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (the login identifier)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find the user holding the given refresh token
    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// List users, newest first
    async fn list(&self, offset: i64, limit: i64) -> AuthResult<Vec<User>>;

    /// Total user count
    async fn count(&self) -> AuthResult<i64>;

    /// Update the whole user record
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete a user; returns whether a record existed
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Audit log repository trait
#[trait_variant::make(AuditLogRepository: Send)]
pub trait LocalAuditLogRepository {
    /// Append one entry to the trail
    async fn append(&self, entry: &AuditEntry) -> AuthResult<()>;

    /// List entries matching the filter, newest first
    async fn list_entries(&self, filter: &AuditFilter) -> AuthResult<Vec<AuditEntry>>;

    /// Count entries matching the filter
    async fn count_entries(&self, filter: &AuditFilter) -> AuthResult<i64>;

    /// Aggregate outcome counts matching the filter
    async fn stats(&self, filter: &AuditFilter) -> AuthResult<AuditStats>;

    /// Delete one entry; returns whether it existed
    async fn delete_entry(&self, id: &crate::domain::value_object::user_id::AuditLogId)
        -> AuthResult<bool>;

    /// Delete all entries matching the filter; returns the count removed
    async fn delete_entries(&self, filter: &AuditFilter) -> AuthResult<u64>;
}
