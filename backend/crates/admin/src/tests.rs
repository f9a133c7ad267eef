//! Admin Handler Tests
//!
//! Drives the handlers directly with an in-memory repository double,
//! covering the guard wiring, self-action blocks and audit entries.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};

use platform::password::BcryptHasher;

use auth::audit::{AuditAction, AuditEntry, AuditFilter, AuditOutcome, AuditSeverity};
use auth::authorize::CurrentUser;
use auth::domain::entity::user::User;
use auth::domain::repository::{AuditLogRepository, AuditStats, UserRepository};
use auth::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_id::{AuditLogId, UserId},
    user_password::UserPassword,
    user_role::Role,
};
use auth::error::{AuthError, AuthResult};

use crate::error::AdminError;
use crate::presentation::dto::{
    CreateUserRequest, LogStatsQuery, LogsQuery, PageQuery, PurgeLogsRequest, UpdateUserRequest,
};
use crate::presentation::handlers::{self, AdminAppState};

// ============================================================================
// In-memory repository double
// ============================================================================

#[derive(Default)]
struct MemState {
    users: Vec<User>,
    logs: Vec<AuditEntry>,
}

#[derive(Clone, Default)]
struct MemRepo(Arc<Mutex<MemState>>);

impl MemRepo {
    fn logs(&self) -> Vec<AuditEntry> {
        self.0.lock().unwrap().logs.clone()
    }

    fn log_actions(&self) -> Vec<AuditAction> {
        self.logs().iter().map(|e| e.action).collect()
    }
}

impl UserRepository for MemRepo {
    async fn insert(&self, user: &User) -> AuthResult<()> {
        let mut state = self.0.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let state = self.0.lock().unwrap();
        Ok(state.users.iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.0.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == *email).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.has_refresh_token(token))
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> AuthResult<Vec<User>> {
        let state = self.0.lock().unwrap();
        let mut users = state.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.0.lock().unwrap().users.len() as i64)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut state = self.0.lock().unwrap();
        if let Some(existing) = state.users.iter_mut().find(|u| u.user_id == user.user_id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut state = self.0.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.user_id != *user_id);
        Ok(state.users.len() < before)
    }
}

fn matches_filter(entry: &AuditEntry, filter: &AuditFilter) -> bool {
    filter.subject.is_none_or(|s| entry.subject == Some(s))
        && filter.action.is_none_or(|a| entry.action == a)
        && filter.resource.is_none_or(|r| entry.resource == r)
        && filter.outcome.is_none_or(|o| entry.outcome == o)
        && filter.severity.is_none_or(|s| entry.severity == s)
        && filter.from.is_none_or(|f| entry.created_at >= f)
        && filter.to.is_none_or(|t| entry.created_at <= t)
}

impl AuditLogRepository for MemRepo {
    async fn append(&self, entry: &AuditEntry) -> AuthResult<()> {
        self.0.lock().unwrap().logs.push(entry.clone());
        Ok(())
    }

    async fn list_entries(&self, filter: &AuditFilter) -> AuthResult<Vec<AuditEntry>> {
        let mut entries: Vec<_> = self
            .logs()
            .into_iter()
            .filter(|e| matches_filter(e, filter))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn count_entries(&self, filter: &AuditFilter) -> AuthResult<i64> {
        Ok(self
            .logs()
            .iter()
            .filter(|e| matches_filter(e, filter))
            .count() as i64)
    }

    async fn stats(&self, filter: &AuditFilter) -> AuthResult<AuditStats> {
        let mut stats = AuditStats::default();
        for entry in self.logs().iter().filter(|e| matches_filter(e, filter)) {
            stats.total += 1;
            match entry.outcome {
                AuditOutcome::Success => stats.success += 1,
                AuditOutcome::Failed => stats.failed += 1,
                AuditOutcome::Warning => stats.warning += 1,
            }
        }
        Ok(stats)
    }

    async fn delete_entry(&self, id: &AuditLogId) -> AuthResult<bool> {
        let mut state = self.0.lock().unwrap();
        let before = state.logs.len();
        state.logs.retain(|e| e.id != *id);
        Ok(state.logs.len() < before)
    }

    async fn delete_entries(&self, filter: &AuditFilter) -> AuthResult<u64> {
        let mut state = self.0.lock().unwrap();
        let before = state.logs.len();
        let filter = filter.clone();
        state.logs.retain(|e| !matches_filter(e, &filter));
        Ok((before - state.logs.len()) as u64)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const TEST_HASH: &str = "$2b$04$abcdefghijklmnopqrstuv";

fn test_state() -> (MemRepo, AdminAppState<MemRepo>) {
    let repo = MemRepo::default();
    let state = AdminAppState {
        repo: Arc::new(repo.clone()),
        hasher: Arc::new(BcryptHasher::new(4)),
    };
    (repo, state)
}

fn seed_user(repo: &MemRepo, email: &str, role: Role) -> User {
    let mut user = User::new(
        Email::new(email).unwrap(),
        DisplayName::new("Seeded User").unwrap(),
        UserPassword::from_db(TEST_HASH).unwrap(),
    );
    user.set_role(role);
    repo.0.lock().unwrap().users.push(user.clone());
    user
}

fn current(user: &User) -> CurrentUser {
    CurrentUser::from_user(user)
}

fn addr() -> ConnectInfo<SocketAddr> {
    ConnectInfo("127.0.0.1:4000".parse().unwrap())
}

// ============================================================================
// User management
// ============================================================================

#[tokio::test]
async fn test_list_users_requires_grant() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    let plain = seed_user(&repo, "user@example.com", Role::User);

    let page = handlers::list_users(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Query(PageQuery::default()),
    )
    .await
    .unwrap();
    assert_eq!(page.0.users.len(), 2);
    assert_eq!(page.0.pagination.total_items, 2);

    let err = handlers::list_users(
        State(state),
        Extension(current(&plain)),
        HeaderMap::new(),
        addr(),
        Query(PageQuery::default()),
    )
    .await;
    assert!(matches!(err, Err(AdminError::Auth(AuthError::Forbidden))));
    assert!(repo.log_actions().contains(&AuditAction::PermissionDenied));
}

#[tokio::test]
async fn test_get_user_ownership() {
    let (repo, state) = test_state();
    let plain = seed_user(&repo, "user@example.com", Role::User);
    let other = seed_user(&repo, "other@example.com", Role::User);

    // Own record works without any grant
    let resp = handlers::get_user(
        State(state.clone()),
        Extension(current(&plain)),
        HeaderMap::new(),
        addr(),
        Path(plain.user_id),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.email, "user@example.com");

    // Someone else's record does not
    let err = handlers::get_user(
        State(state),
        Extension(current(&plain)),
        HeaderMap::new(),
        addr(),
        Path(other.user_id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::Auth(AuthError::Forbidden))));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);

    let err = handlers::get_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(UserId::new()),
    )
    .await;
    assert!(matches!(err, Err(AdminError::UserNotFound)));
}

#[tokio::test]
async fn test_create_user() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);

    handlers::create_user(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Json(CreateUserRequest {
            name: "New Manager".to_string(),
            email: "manager@example.com".to_string(),
            password: "Password1".to_string(),
            role: Some(Role::Manager),
        }),
    )
    .await
    .unwrap();

    let created = repo
        .find_by_email(&Email::new("manager@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.role, Role::Manager);
    assert!(repo.log_actions().contains(&AuditAction::UserCreate));

    // Second create with the same email collides
    let err = handlers::create_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Json(CreateUserRequest {
            name: "Duplicate".to_string(),
            email: "manager@example.com".to_string(),
            password: "Password1".to_string(),
            role: None,
        }),
    )
    .await;
    assert!(matches!(
        err,
        Err(AdminError::Auth(AuthError::DuplicateEmail))
    ));
}

#[tokio::test]
async fn test_update_user_role_change_audited_high() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    let target = seed_user(&repo, "user@example.com", Role::User);

    let resp = handlers::update_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(target.user_id),
        Json(UpdateUserRequest {
            role: Some(Role::Manager),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.role, Role::Manager);

    let logs = repo.logs();
    let entry = logs
        .iter()
        .find(|e| e.action == AuditAction::RoleChange)
        .unwrap();
    assert_eq!(entry.severity, AuditSeverity::High);
    assert_eq!(
        entry.details.get("previousRole").and_then(|v| v.as_str()),
        Some("user")
    );
    assert_eq!(
        entry.details.get("newRole").and_then(|v| v.as_str()),
        Some("manager")
    );
}

#[tokio::test]
async fn test_update_own_role_blocked() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);

    let err = handlers::update_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(admin.user_id),
        Json(UpdateUserRequest {
            role: Some(Role::User),
            ..Default::default()
        }),
    )
    .await;
    assert!(matches!(err, Err(AdminError::SelfAction(_))));
}

#[tokio::test]
async fn test_update_own_name_allowed_without_grant() {
    let (repo, state) = test_state();
    let plain = seed_user(&repo, "user@example.com", Role::User);

    let resp = handlers::update_user(
        State(state.clone()),
        Extension(current(&plain)),
        HeaderMap::new(),
        addr(),
        Path(plain.user_id),
        Json(UpdateUserRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.name, "Renamed");

    // Flipping their own active flag is a privileged field
    let err = handlers::update_user(
        State(state),
        Extension(current(&plain)),
        HeaderMap::new(),
        addr(),
        Path(plain.user_id),
        Json(UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        }),
    )
    .await;
    assert!(matches!(err, Err(AdminError::Auth(AuthError::Forbidden))));
}

#[tokio::test]
async fn test_delete_user() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    let target = seed_user(&repo, "user@example.com", Role::User);

    // Self-delete is blocked before touching the store
    let err = handlers::delete_user(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(admin.user_id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::SelfAction(_))));

    handlers::delete_user(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(target.user_id),
    )
    .await
    .unwrap();
    assert!(repo.find_by_id(&target.user_id).await.unwrap().is_none());
    assert!(repo.log_actions().contains(&AuditAction::UserDelete));

    let err = handlers::delete_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(target.user_id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::UserNotFound)));
}

#[tokio::test]
async fn test_activate_deactivate_user() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    let target = seed_user(&repo, "user@example.com", Role::User);

    let resp = handlers::deactivate_user(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(target.user_id),
    )
    .await
    .unwrap();
    assert!(!resp.0.is_active);
    assert!(repo.log_actions().contains(&AuditAction::UserDeactivate));

    let resp = handlers::activate_user(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(target.user_id),
    )
    .await
    .unwrap();
    assert!(resp.0.is_active);

    let err = handlers::deactivate_user(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(admin.user_id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::SelfAction(_))));
}

// ============================================================================
// Activity logs
// ============================================================================

async fn seed_log(repo: &MemRepo, action: AuditAction, outcome: AuditOutcome) -> AuditEntry {
    let entry = AuditEntry::new(
        None,
        action,
        auth::domain::permission::Resource::Auth,
        &platform::client::RequestClient::default(),
    )
    .with_outcome(outcome);
    repo.append(&entry).await.unwrap();
    entry
}

#[tokio::test]
async fn test_list_logs_filtered() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    seed_log(&repo, AuditAction::Login, AuditOutcome::Success).await;
    seed_log(&repo, AuditAction::FailedLogin, AuditOutcome::Failed).await;
    seed_log(&repo, AuditAction::FailedLogin, AuditOutcome::Failed).await;

    let resp = handlers::list_logs(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Query(LogsQuery {
            action: Some(AuditAction::FailedLogin),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.logs.len(), 2);
    assert_eq!(resp.0.pagination.total_items, 2);
}

#[tokio::test]
async fn test_log_stats_counts() {
    let (repo, state) = test_state();
    let manager = seed_user(&repo, "manager@example.com", Role::Manager);
    seed_log(&repo, AuditAction::Login, AuditOutcome::Success).await;
    seed_log(&repo, AuditAction::FailedLogin, AuditOutcome::Failed).await;

    let resp = handlers::log_stats(
        State(state),
        Extension(current(&manager)),
        HeaderMap::new(),
        addr(),
        Query(LogStatsQuery::default()),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.total_logs, 2);
    assert_eq!(resp.0.success_logs, 1);
    assert_eq!(resp.0.failed_logs, 1);
}

#[tokio::test]
async fn test_delete_log_admin_only() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    let manager = seed_user(&repo, "manager@example.com", Role::Manager);
    let entry = seed_log(&repo, AuditAction::Login, AuditOutcome::Success).await;

    // Manager holds logs:read but not logs:delete
    let err = handlers::delete_log(
        State(state.clone()),
        Extension(current(&manager)),
        HeaderMap::new(),
        addr(),
        Path(entry.id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::Auth(AuthError::Forbidden))));

    handlers::delete_log(
        State(state.clone()),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(entry.id),
    )
    .await
    .unwrap();

    let err = handlers::delete_log(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Path(entry.id),
    )
    .await;
    assert!(matches!(err, Err(AdminError::LogNotFound)));
}

#[tokio::test]
async fn test_purge_logs() {
    let (repo, state) = test_state();
    let admin = seed_user(&repo, "admin@example.com", Role::Admin);
    seed_log(&repo, AuditAction::FailedLogin, AuditOutcome::Failed).await;
    seed_log(&repo, AuditAction::FailedLogin, AuditOutcome::Failed).await;
    seed_log(&repo, AuditAction::Login, AuditOutcome::Success).await;

    let resp = handlers::purge_logs(
        State(state),
        Extension(current(&admin)),
        HeaderMap::new(),
        addr(),
        Json(PurgeLogsRequest {
            action: Some(AuditAction::FailedLogin),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.deleted_count, 2);
    assert_eq!(repo.logs().len(), 1);
}
