//! Authorization Guards
//!
//! Permission checks as plain functions over a verified identity. The
//! guards know nothing about HTTP routing; handlers call them with the
//! identity the authentication middleware resolved, which keeps them
//! usable from jobs and tests as well. Every denial leaves a
//! `permission_denied` audit entry before the error returns.

use crate::audit::{AuditAction, AuditEntry, AuditOutcome, AuditSeverity, AuditSink};
use crate::domain::permission::{self, Action, Resource};
use crate::domain::repository::AuditLogRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::Role};
use crate::error::{AuthError, AuthResult};
use platform::client::RequestClient;

/// Verified identity of the requester
///
/// Built by the authentication middleware from a verified access token
/// and a fresh user lookup, so role and active status are current even
/// when the token is a few minutes old.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
}

impl CurrentUser {
    pub fn from_user(user: &crate::domain::entity::user::User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Require the requester's role to be one of `allowed`
pub async fn require_role<L>(
    current: &CurrentUser,
    allowed: &[Role],
    audit: &AuditSink<L>,
    client: &RequestClient,
) -> AuthResult<()>
where
    L: AuditLogRepository,
{
    if allowed.contains(&current.role) {
        return Ok(());
    }

    let required: Vec<_> = allowed.iter().map(|r| r.code()).collect();
    audit
        .record(
            AuditEntry::new(
                Some(current.user_id),
                AuditAction::PermissionDenied,
                Resource::System,
                client,
            )
            .with_outcome(AuditOutcome::Failed)
            .with_severity(AuditSeverity::Medium)
            .with_detail("requiredRoles", required)
            .with_detail("userRole", current.role.code()),
        )
        .await;

    Err(AuthError::Forbidden)
}

/// Require the matrix to grant `action` on `resource` for the
/// requester's role
pub async fn require_permission<L>(
    current: &CurrentUser,
    resource: Resource,
    action: Action,
    audit: &AuditSink<L>,
    client: &RequestClient,
) -> AuthResult<()>
where
    L: AuditLogRepository,
{
    if permission::allows(current.role, resource, action) {
        return Ok(());
    }

    audit
        .record(
            AuditEntry::new(
                Some(current.user_id),
                AuditAction::PermissionDenied,
                resource,
                client,
            )
            .with_outcome(AuditOutcome::Failed)
            .with_severity(AuditSeverity::Medium)
            .with_detail(
                "requiredPermission",
                format!("{}:{}", resource.code(), action.code()),
            )
            .with_detail("userRole", current.role.code()),
        )
        .await;

    Err(AuthError::Forbidden)
}

/// Allow access to the requester's own record, otherwise fall back to
/// the permission matrix
///
/// The ownership test runs first: a plain user passes on their own id
/// without holding any grant at all.
pub async fn require_ownership_or_permission<L>(
    current: &CurrentUser,
    target: &UserId,
    resource: Resource,
    action: Action,
    audit: &AuditSink<L>,
    client: &RequestClient,
) -> AuthResult<()>
where
    L: AuditLogRepository,
{
    if current.user_id == *target {
        return Ok(());
    }

    if permission::allows(current.role, resource, action) {
        return Ok(());
    }

    audit
        .record(
            AuditEntry::new(
                Some(current.user_id),
                AuditAction::PermissionDenied,
                resource,
                client,
            )
            .with_outcome(AuditOutcome::Failed)
            .with_severity(AuditSeverity::Medium)
            .with_detail(
                "requiredPermission",
                format!("{}:{}", resource.code(), action.code()),
            )
            .with_detail("userRole", current.role.code())
            .with_detail("resourceId", target.to_string()),
        )
        .await;

    Err(AuthError::Forbidden)
}
