//! Admin Router
//!
//! Every route sits behind the auth crate's `authenticate` middleware;
//! fine-grained permission checks run inside the handlers.

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use platform::password::BcryptHasher;

use auth::application::config::AuthConfig;
use auth::domain::repository::{AuditLogRepository, UserRepository};
use auth::infra::postgres::PgAuthRepository;
use auth::presentation::middleware::{self, AuthMiddlewareState};
use auth::token::{JwtSigner, TokenService};

use crate::presentation::handlers::{self, AdminAppState};

/// Create the Admin router with PostgreSQL repository
pub fn admin_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    admin_router_generic(repo, config)
}

/// Create a generic Admin router for any repository implementation
pub fn admin_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let tokens = TokenService::new(
        Arc::new(JwtSigner::new(&config.signing_secret)),
        config.access_token_ttl,
        config.refresh_token_ttl,
    );

    let state = AdminAppState {
        repo: repo.clone(),
        hasher: Arc::new(BcryptHasher::new(config.hash_cost)),
    };
    let mw_state = AuthMiddlewareState { repo, tokens };

    Router::new()
        .route(
            "/users",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .route("/users/{id}/activate", post(handlers::activate_user::<R>))
        .route(
            "/users/{id}/deactivate",
            post(handlers::deactivate_user::<R>),
        )
        .route(
            "/logs",
            get(handlers::list_logs::<R>).delete(handlers::purge_logs::<R>),
        )
        .route("/logs/stats", get(handlers::log_stats::<R>))
        .route("/logs/{id}", delete(handlers::delete_log::<R>))
        .route_layer(axum::middleware::from_fn(move |req, next| {
            middleware::authenticate(mw_state.clone(), req, next)
        }))
        .with_state(state)
}
