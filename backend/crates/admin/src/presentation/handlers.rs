//! Admin HTTP Handlers
//!
//! Thin plumbing over the user and audit stores. Each handler resolves
//! its guard first; the guards audit their own denials, so a handler
//! body only runs for a granted request.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use platform::client::extract_client;
use platform::password::PasswordHasher;

use auth::audit::{AuditAction, AuditEntry, AuditSeverity, AuditSink};
use auth::authorize::{self, CurrentUser};
use auth::domain::entity::user::User;
use auth::domain::permission::{Action, Resource};
use auth::domain::repository::{AuditLogRepository, UserRepository};
use auth::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_id::{AuditLogId, UserId},
    user_password::{RawPassword, UserPassword},
};
use auth::error::AuthError;
use auth::models::{MessageResponse, UserResponse};

use crate::error::{AdminError, AdminResult};
use crate::presentation::dto::{
    CreateUserRequest, DeletedCountResponse, LogListResponse, LogStatsQuery, LogStatsResponse,
    LogsQuery, PageMeta, PageQuery, PurgeLogsRequest, UpdateUserRequest, UserListResponse,
    DEFAULT_USER_PAGE_SIZE,
};

/// Shared state for admin handlers
pub struct AdminAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl<R> AdminAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    pub fn audit(&self) -> AuditSink<R> {
        AuditSink::new(self.repo.clone())
    }
}

impl<R> Clone for AdminAppState<R>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

// ============================================================================
// User management
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Query(query): Query<PageQuery>,
) -> AdminResult<Json<UserListResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(&current, Resource::Users, Action::Read, &state.audit(), &client)
        .await?;

    let page = query.resolve(DEFAULT_USER_PAGE_SIZE);
    let users = state.repo.list(page.offset(), page.limit).await?;
    let total = state.repo.count().await?;

    Ok(Json(UserListResponse {
        users: users.iter().map(UserResponse::from_user).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/admin/users/{id}
pub async fn get_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(user_id): Path<UserId>,
) -> AdminResult<Json<UserResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_ownership_or_permission(
        &current,
        &user_id,
        Resource::Users,
        Action::Read,
        &state.audit(),
        &client,
    )
    .await?;

    let user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AdminError::UserNotFound)?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// POST /api/admin/users
pub async fn create_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<CreateUserRequest>,
) -> AdminResult<impl IntoResponse>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(
        &current,
        Resource::Users,
        Action::Create,
        &state.audit(),
        &client,
    )
    .await?;

    let email = Email::new(req.email)
        .map_err(|e| AdminError::Validation(e.message().to_string()))?;
    let name = DisplayName::new(req.name)
        .map_err(|e| AdminError::Validation(e.message().to_string()))?;
    let raw_password =
        RawPassword::new(req.password).map_err(|e| AdminError::Validation(e.to_string()))?;

    if state.repo.find_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }

    let password_hash = UserPassword::from_raw(&raw_password, state.hasher.as_ref())
        .map_err(|e| AdminError::Auth(AuthError::Internal(e.to_string())))?;

    let mut user = User::new(email, name, password_hash);
    if let Some(role) = req.role {
        user.set_role(role);
    }

    state.repo.insert(&user).await.map_err(AdminError::Auth)?;

    state
        .audit()
        .record(
            AuditEntry::new(Some(current.user_id), AuditAction::UserCreate, Resource::Users, &client)
                .with_detail("email", user.email.as_str())
                .with_detail("role", user.role.code())
                .with_detail("resourceId", user.user_id.to_string()),
        )
        .await;

    tracing::info!(user_id = %user.user_id, created_by = %current.user_id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// PUT /api/admin/users/{id}
///
/// `name` may be changed by the owner; `role` and `isActive` require
/// the `users:update` grant regardless of ownership. A requester can
/// never change their own role.
pub async fn update_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> AdminResult<Json<UserResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));

    if req.is_empty() {
        return Err(AdminError::Validation("No updatable fields supplied".to_string()));
    }

    if req.touches_privileged_fields() {
        authorize::require_permission(
            &current,
            Resource::Users,
            Action::Update,
            &state.audit(),
            &client,
        )
        .await?;
    } else {
        authorize::require_ownership_or_permission(
            &current,
            &user_id,
            Resource::Users,
            Action::Update,
            &state.audit(),
            &client,
        )
        .await?;
    }

    if req.role.is_some() && current.user_id == user_id {
        return Err(AdminError::SelfAction("You cannot change your own role"));
    }

    let mut user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AdminError::UserNotFound)?;

    let previous_role = user.role;

    if let Some(name) = req.name {
        let name =
            DisplayName::new(name).map_err(|e| AdminError::Validation(e.message().to_string()))?;
        user.set_display_name(name);
    }
    if let Some(role) = req.role {
        user.set_role(role);
    }
    if let Some(active) = req.is_active {
        user.set_active(active);
    }

    state.repo.update(&user).await?;

    let role_changed = user.role != previous_role;
    let entry = if role_changed {
        AuditEntry::new(Some(current.user_id), AuditAction::RoleChange, Resource::Users, &client)
            .with_severity(AuditSeverity::High)
            .with_detail("resourceId", user.user_id.to_string())
            .with_detail("previousRole", previous_role.code())
            .with_detail("newRole", user.role.code())
    } else {
        AuditEntry::new(Some(current.user_id), AuditAction::UserUpdate, Resource::Users, &client)
            .with_detail("resourceId", user.user_id.to_string())
    };
    state.audit().record(entry).await;

    Ok(Json(UserResponse::from_user(&user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(user_id): Path<UserId>,
) -> AdminResult<Json<MessageResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(
        &current,
        Resource::Users,
        Action::Delete,
        &state.audit(),
        &client,
    )
    .await?;

    if current.user_id == user_id {
        return Err(AdminError::SelfAction("You cannot delete your own account"));
    }

    if !state.repo.delete(&user_id).await? {
        return Err(AdminError::UserNotFound);
    }

    state
        .audit()
        .record(
            AuditEntry::new(Some(current.user_id), AuditAction::UserDelete, Resource::Users, &client)
                .with_severity(AuditSeverity::High)
                .with_detail("resourceId", user_id.to_string()),
        )
        .await;

    tracing::info!(user_id = %user_id, deleted_by = %current.user_id, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// POST /api/admin/users/{id}/activate
pub async fn activate_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(user_id): Path<UserId>,
) -> AdminResult<Json<UserResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    set_user_active(state, current, headers, addr, user_id, true).await
}

/// POST /api/admin/users/{id}/deactivate
pub async fn deactivate_user<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(user_id): Path<UserId>,
) -> AdminResult<Json<UserResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    set_user_active(state, current, headers, addr, user_id, false).await
}

async fn set_user_active<R>(
    state: AdminAppState<R>,
    current: CurrentUser,
    headers: HeaderMap,
    addr: std::net::SocketAddr,
    user_id: UserId,
    active: bool,
) -> AdminResult<Json<UserResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(
        &current,
        Resource::Users,
        Action::Update,
        &state.audit(),
        &client,
    )
    .await?;

    if !active && current.user_id == user_id {
        return Err(AdminError::SelfAction("You cannot deactivate your own account"));
    }

    let mut user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AdminError::UserNotFound)?;

    user.set_active(active);
    state.repo.update(&user).await?;

    let action = if active {
        AuditAction::UserActivate
    } else {
        AuditAction::UserDeactivate
    };
    state
        .audit()
        .record(
            AuditEntry::new(Some(current.user_id), action, Resource::Users, &client)
                .with_detail("resourceId", user.user_id.to_string())
                .with_detail("email", user.email.as_str()),
        )
        .await;

    Ok(Json(UserResponse::from_user(&user)))
}

// ============================================================================
// Activity logs
// ============================================================================

/// GET /api/admin/logs
pub async fn list_logs<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Query(query): Query<LogsQuery>,
) -> AdminResult<Json<LogListResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(&current, Resource::Logs, Action::Read, &state.audit(), &client)
        .await?;

    let (page, filter) = query.filter();
    let logs = state.repo.list_entries(&filter).await?;
    let total = state.repo.count_entries(&filter).await?;

    Ok(Json(LogListResponse {
        logs,
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/admin/logs/stats
pub async fn log_stats<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Query(query): Query<LogStatsQuery>,
) -> AdminResult<Json<LogStatsResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(&current, Resource::Stats, Action::Read, &state.audit(), &client)
        .await?;

    let filter = auth::audit::AuditFilter {
        from: query.start_date,
        to: query.end_date,
        ..auth::audit::AuditFilter::new()
    };
    let stats = state.repo.stats(&filter).await?;

    Ok(Json(stats.into()))
}

/// DELETE /api/admin/logs/{id}
pub async fn delete_log<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Path(log_id): Path<AuditLogId>,
) -> AdminResult<Json<MessageResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(&current, Resource::Logs, Action::Delete, &state.audit(), &client)
        .await?;

    if !state.repo.delete_entry(&log_id).await? {
        return Err(AdminError::LogNotFound);
    }

    tracing::info!(log_id = %log_id, deleted_by = %current.user_id, "Activity log deleted");

    Ok(Json(MessageResponse {
        message: "Activity log deleted successfully".to_string(),
    }))
}

/// DELETE /api/admin/logs
pub async fn purge_logs<R>(
    State(state): State<AdminAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<PurgeLogsRequest>,
) -> AdminResult<Json<DeletedCountResponse>>
where
    R: UserRepository + AuditLogRepository + Clone + Send + Sync + 'static,
{
    let client = extract_client(&headers, Some(addr.ip()));
    authorize::require_permission(&current, Resource::Logs, Action::Delete, &state.audit(), &client)
        .await?;

    let deleted_count = state.repo.delete_entries(&req.into_filter()).await?;

    tracing::info!(deleted_count, purged_by = %current.user_id, "Activity logs purged");

    Ok(Json(DeletedCountResponse {
        message: format!("{deleted_count} activity logs deleted successfully"),
        deleted_count,
    }))
}
