//! Sign Up Use Case
//!
//! Registers a new user and signs them in immediately with a fresh
//! token pair.

use std::sync::Arc;

use platform::client::RequestClient;
use platform::password::PasswordHasher;

use crate::application::AuthOutput;
use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::domain::entity::user::User;
use crate::domain::permission::Resource;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    user_repo: Arc<U>,
    audit: AuditSink<L>,
    tokens: TokenService,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, L> SignUpUseCase<U, L>
where
    U: UserRepository,
    L: AuditLogRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        audit: AuditSink<L>,
        tokens: TokenService,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            audit,
            tokens,
            hasher,
        }
    }

    pub async fn execute(
        &self,
        input: SignUpInput,
        client: &RequestClient,
    ) -> AuthResult<AuthOutput> {
        let email = Email::new(input.email)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let name = DisplayName::new(input.name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let raw_password = RawPassword::new(input.password)?;

        // Explicit pre-check keeps the common collision on the cheap
        // path; the unique index still backs it up under races.
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.hasher.as_ref())?;
        let mut user = User::new(email, name, password_hash);

        // New users start with a token pair already on file
        let access_token = self.tokens.issue_access(&user)?;
        let refresh_token = self.tokens.issue_refresh(&user)?;
        user.add_refresh_token(refresh_token.clone());

        self.user_repo.insert(&user).await?;

        self.audit
            .record(
                AuditEntry::new(
                    Some(user.user_id),
                    AuditAction::Signup,
                    Resource::Auth,
                    client,
                )
                .with_detail("email", user.email.as_str())
                .with_detail("role", user.role.code()),
            )
            .await;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(AuthOutput {
            user,
            access_token,
            refresh_token,
        })
    }
}
