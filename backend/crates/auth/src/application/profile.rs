//! Profile Use Case
//!
//! Loads the authenticated user's own record. Redaction (password hash,
//! token list) happens in the response DTO, never here.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Profile use case
pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        // The id comes from a verified token; a missing row means the
        // account vanished between verification and now.
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
