//! Refresh Use Case
//!
//! Single-use refresh token rotation: the presented token must verify
//! cryptographically AND still be on the user's server-side list. It is
//! then replaced by a new one, so replaying it fails.

use std::sync::Arc;

use platform::client::RequestClient;

use crate::application::config::AuthConfig;
use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::domain::permission::Resource;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Refresh output: the rotated token pair
pub struct RefreshOutput {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    user_repo: Arc<U>,
    audit: AuditSink<L>,
    tokens: TokenService,
    config: Arc<AuthConfig>,
}

impl<U, L> RefreshUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        audit: AuditSink<L>,
        tokens: TokenService,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            audit,
            tokens,
            config,
        }
    }

    pub async fn execute(
        &self,
        token: Option<String>,
        client: &RequestClient,
    ) -> AuthResult<RefreshOutput> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingToken),
        };

        let claims = self.tokens.verify_refresh(&token)?;
        let user_id = claims.subject().map_err(|_| AuthError::InvalidToken)?;

        let user = self.user_repo.find_by_id(&user_id).await?;
        let Some(mut user) = user.filter(|u| u.is_active) else {
            return Err(AuthError::InvalidToken);
        };

        // Signature alone is not enough: a rotated-out token verifies
        // but is no longer on the list.
        if !user.has_refresh_token(&token) {
            return Err(AuthError::InvalidToken);
        }

        user.prune_expired_tokens(self.config.refresh_retention);

        let access_token = self.tokens.issue_access(&user)?;
        let refresh_token = self.tokens.issue_refresh(&user)?;

        user.remove_refresh_token(&token);
        user.add_refresh_token(refresh_token.clone());

        self.user_repo.update(&user).await?;

        self.audit
            .record(AuditEntry::new(
                Some(user.user_id),
                AuditAction::TokenRefresh,
                Resource::Auth,
                client,
            ))
            .await;

        Ok(RefreshOutput {
            access_token,
            refresh_token,
        })
    }
}
