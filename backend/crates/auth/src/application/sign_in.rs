//! Sign In Use Case
//!
//! Authenticates a user by email and password. The checks run in a
//! fixed order (unknown email, locked, deactivated, wrong password) and
//! each failure leaves its own audit entry before the error returns.

use std::sync::Arc;

use platform::client::RequestClient;
use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::application::AuthOutput;
use crate::audit::{AuditAction, AuditEntry, AuditOutcome, AuditSeverity, AuditSink};
use crate::domain::entity::user::AccountState;
use crate::domain::permission::Resource;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    user_repo: Arc<U>,
    audit: AuditSink<L>,
    tokens: TokenService,
    hasher: Arc<dyn PasswordHasher>,
    config: Arc<AuthConfig>,
}

impl<U, L> SignInUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        audit: AuditSink<L>,
        tokens: TokenService,
        hasher: Arc<dyn PasswordHasher>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            audit,
            tokens,
            hasher,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        client: &RequestClient,
    ) -> AuthResult<AuthOutput> {
        // An unparseable email can never match a stored (validated) one,
        // so it takes the same path as an unknown address.
        let user = match Email::new(&input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(mut user) = user else {
            // Unknown email: no subject to attribute, the attempted
            // address goes into the details instead.
            self.audit
                .record(
                    AuditEntry::new(None, AuditAction::FailedLogin, Resource::Auth, client)
                        .with_outcome(AuditOutcome::Failed)
                        .with_severity(AuditSeverity::Medium)
                        .with_detail("email", input.email.as_str())
                        .with_detail("reason", "User not found"),
                )
                .await;
            return Err(AuthError::InvalidCredentials);
        };

        match user.state(self.config.lockout_threshold, self.config.lockout_window) {
            AccountState::Locked => {
                self.audit
                    .record(
                        AuditEntry::new(
                            Some(user.user_id),
                            AuditAction::AccountLocked,
                            Resource::Auth,
                            client,
                        )
                        .with_outcome(AuditOutcome::Failed)
                        .with_severity(AuditSeverity::High)
                        .with_detail("email", user.email.as_str())
                        .with_detail("attempts", user.failed_attempts),
                    )
                    .await;
                return Err(AuthError::AccountLocked);
            }
            AccountState::Inactive => {
                self.audit
                    .record(
                        AuditEntry::new(
                            Some(user.user_id),
                            AuditAction::FailedLogin,
                            Resource::Auth,
                            client,
                        )
                        .with_outcome(AuditOutcome::Failed)
                        .with_severity(AuditSeverity::Medium)
                        .with_detail("email", user.email.as_str())
                        .with_detail("reason", "Account deactivated"),
                    )
                    .await;
                return Err(AuthError::AccountDeactivated);
            }
            AccountState::Active => {}
        }

        let password_valid = match RawPassword::new(input.password) {
            Ok(raw) => user.password_hash.verify(&raw, self.hasher.as_ref()),
            // Policy-invalid input cannot be a stored password
            Err(_) => false,
        };

        if !password_valid {
            user.record_failure();
            self.user_repo.update(&user).await?;

            self.audit
                .record(
                    AuditEntry::new(
                        Some(user.user_id),
                        AuditAction::FailedLogin,
                        Resource::Auth,
                        client,
                    )
                    .with_outcome(AuditOutcome::Failed)
                    .with_severity(AuditSeverity::Medium)
                    .with_detail("email", user.email.as_str())
                    .with_detail("reason", "Invalid password")
                    .with_detail("attempts", user.failed_attempts),
                )
                .await;
            return Err(AuthError::InvalidCredentials);
        }

        // Success path: housekeeping before issuing the new pair
        user.prune_expired_tokens(self.config.refresh_retention);

        let access_token = self.tokens.issue_access(&user)?;
        let refresh_token = self.tokens.issue_refresh(&user)?;
        user.add_refresh_token(refresh_token.clone());

        user.reset_failures();
        user.record_login(client.ip_string());

        self.user_repo.update(&user).await?;

        self.audit
            .record(
                AuditEntry::new(
                    Some(user.user_id),
                    AuditAction::Login,
                    Resource::Auth,
                    client,
                )
                .with_detail("email", user.email.as_str())
                .with_detail("role", user.role.code()),
            )
            .await;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(AuthOutput {
            user,
            access_token,
            refresh_token,
        })
    }
}
