//! Sign Out Use Case
//!
//! Revokes one refresh token. Idempotent: logging out with a token that
//! is unknown, already revoked, or expired still succeeds.

use std::sync::Arc;

use platform::client::RequestClient;

use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::domain::permission::Resource;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    user_repo: Arc<U>,
    audit: AuditSink<L>,
}

impl<U, L> SignOutUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    pub fn new(user_repo: Arc<U>, audit: AuditSink<L>) -> Self {
        Self { user_repo, audit }
    }

    pub async fn execute(&self, token: Option<String>, client: &RequestClient) -> AuthResult<()> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingToken),
        };

        // Unknown token: nothing to revoke, still a successful logout
        if let Some(mut user) = self.user_repo.find_by_refresh_token(&token).await? {
            user.remove_refresh_token(&token);
            self.user_repo.update(&user).await?;

            self.audit
                .record(AuditEntry::new(
                    Some(user.user_id),
                    AuditAction::Logout,
                    Resource::Auth,
                    client,
                ))
                .await;

            tracing::info!(user_id = %user.user_id, "User signed out");
        }

        Ok(())
    }
}
