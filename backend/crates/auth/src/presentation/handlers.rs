//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use platform::client::extract_client;
use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::application::{
    ProfileUseCase, RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::audit::AuditSink;
use crate::authorize::CurrentUser;
use crate::domain::repository::{AuditLogRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, MessageResponse, ProfileResponse, RefreshTokenRequest, SignInRequest,
    SignUpRequest, TokenPairResponse, UserResponse,
};
use crate::token::TokenService;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: TokenService,
    pub hasher: Arc<dyn PasswordHasher>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    pub fn audit(&self) -> AuditSink<R> {
        AuditSink::new(self.repo.clone())
    }
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
            hasher: self.hasher.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));

    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.audit(),
        state.tokens.clone(),
        state.hasher.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, &client).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from_user(&output.user),
            access_token: output.access_token,
            refresh_token: output.refresh_token,
        }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.audit(),
        state.tokens.clone(),
        state.hasher.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, &client).await?;

    Ok(Json(AuthResponse {
        user: UserResponse::from_user(&output.user),
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<RefreshTokenRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));

    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.audit(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.refresh_token, &client).await?;

    Ok(Json(TokenPairResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/logout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<RefreshTokenRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));

    let use_case = SignOutUseCase::new(state.repo.clone(), state.audit());
    use_case.execute(req.refresh_token, &client).await?;

    Ok(Json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /api/auth/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone());
    let user = use_case.execute(&current.user_id).await?;

    Ok(Json(ProfileResponse::from_user(&user)))
}
