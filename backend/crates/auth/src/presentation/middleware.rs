//! Auth Middleware
//!
//! Resolves the Bearer access token into a `CurrentUser` request
//! extension. Authorization itself stays out of the middleware; the
//! guards in `authorize` run inside handlers where the target of the
//! operation is known.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::bearer::extract_bearer_from_headers;

use crate::authorize::CurrentUser;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;
use crate::token::TokenService;

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: TokenService,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Middleware that requires a valid access token
///
/// The token proves identity; role and active status come from a fresh
/// user lookup so a deactivated account is cut off before its access
/// token expires.
pub async fn authenticate<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = match extract_bearer_from_headers(req.headers()) {
        Ok(token) => token,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let claims = match state.tokens.verify_access(token) {
        Ok(claims) => claims,
        Err(e) => return Err(e.into_response()),
    };

    let user_id = match claims.subject() {
        Ok(id) => id,
        Err(_) => return Err(AuthError::InvalidToken.into_response()),
    };

    let user = match state.repo.find_by_id(&user_id).await {
        Ok(user) => user,
        Err(e) => return Err(e.into_response()),
    };

    let Some(user) = user.filter(|u| u.is_active) else {
        return Err(AuthError::Unauthenticated.into_response());
    };

    req.extensions_mut().insert(CurrentUser::from_user(&user));

    Ok(next.run(req).await)
}
