//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::password::BcryptHasher;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{self, AuthMiddlewareState};
use crate::token::{JwtSigner, TokenService};

/// Build the handler state from a repository and configuration
pub fn build_state<R>(repo: R, config: AuthConfig) -> AuthAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let tokens = TokenService::new(
        Arc::new(JwtSigner::new(&config.signing_secret)),
        config.access_token_ttl,
        config.refresh_token_ttl,
    );
    let hasher = Arc::new(BcryptHasher::new(config.hash_cost));

    AuthAppState {
        repo: Arc::new(repo),
        tokens,
        hasher,
        config: Arc::new(config),
    }
}

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let state = build_state(repo, config);

    let mw_state = AuthMiddlewareState {
        repo: state.repo.clone(),
        tokens: state.tokens.clone(),
    };

    let protected = Router::new()
        .route("/profile", get(handlers::profile::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            middleware::authenticate(mw_state.clone(), req, next)
        }));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::sign_in::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::sign_out::<R>))
        .merge(protected)
        .with_state(state)
}
