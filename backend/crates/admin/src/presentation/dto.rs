//! Admin Request / Response DTOs
//!
//! Wire types use camelCase field names. User projections reuse the
//! redacted `UserResponse` from the auth crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use auth::audit::{AuditAction, AuditEntry, AuditFilter, AuditOutcome, AuditSeverity};
use auth::domain::permission::Resource;
use auth::domain::repository::AuditStats;
use auth::domain::value_object::{user_id::UserId, user_role::Role};
use auth::models::UserResponse;

/// Default page size for user listings
pub const DEFAULT_USER_PAGE_SIZE: i64 = 10;

/// Upper bound on page size for any listing
pub const MAX_PAGE_SIZE: i64 = 100;

// ============================================================================
// Pagination
// ============================================================================

/// Page / limit query parameters, both optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Resolved 1-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub limit: i64,
}

impl Page {
    pub fn resolve(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            number: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.limit
    }
}

impl PageQuery {
    pub fn resolve(&self, default_limit: i64) -> Page {
        Page::resolve(self.page, self.limit, default_limit)
    }
}

/// Pagination metadata attached to listing responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: Page, total_items: i64) -> Self {
        Self {
            current_page: page.number,
            total_pages: (total_items + page.limit - 1) / page.limit,
            total_items,
            has_next: page.number * page.limit < total_items,
            has_prev: page.number > 1,
        }
    }
}

// ============================================================================
// User management
// ============================================================================

/// GET /api/admin/users response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PageMeta,
}

/// POST /api/admin/users request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// PUT /api/admin/users/{id} request
///
/// Absent fields are left untouched. `role` and `isActive` are
/// privileged fields; the handler requires a matrix grant for them even
/// when the requester owns the record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    /// Whether the payload touches fields ownership alone cannot change
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.is_active.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

// ============================================================================
// Activity logs
// ============================================================================

/// GET /api/admin/logs query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<UserId>,
    pub action: Option<AuditAction>,
    pub resource: Option<Resource>,
    pub outcome: Option<AuditOutcome>,
    pub severity: Option<AuditSeverity>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl LogsQuery {
    /// Resolve into a page plus the repository filter
    pub fn filter(&self) -> (Page, AuditFilter) {
        let page = Page::resolve(self.page, self.limit, AuditFilter::DEFAULT_LIMIT);
        let filter = AuditFilter {
            subject: self.user_id,
            action: self.action,
            resource: self.resource,
            outcome: self.outcome,
            severity: self.severity,
            from: self.start_date,
            to: self.end_date,
            offset: page.offset(),
            limit: page.limit,
        };
        (page, filter)
    }
}

/// GET /api/admin/logs response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListResponse {
    pub logs: Vec<AuditEntry>,
    pub pagination: PageMeta,
}

/// GET /api/admin/logs/stats query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// GET /api/admin/logs/stats response: outcome counts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatsResponse {
    pub total_logs: i64,
    pub success_logs: i64,
    pub failed_logs: i64,
    pub warning_logs: i64,
}

impl From<AuditStats> for LogStatsResponse {
    fn from(stats: AuditStats) -> Self {
        Self {
            total_logs: stats.total,
            success_logs: stats.success,
            failed_logs: stats.failed,
            warning_logs: stats.warning,
        }
    }
}

/// DELETE /api/admin/logs request: purge criteria, all optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeLogsRequest {
    pub user_id: Option<UserId>,
    pub action: Option<AuditAction>,
    pub resource: Option<Resource>,
    pub outcome: Option<AuditOutcome>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PurgeLogsRequest {
    pub fn into_filter(self) -> AuditFilter {
        AuditFilter {
            subject: self.user_id,
            action: self.action,
            resource: self.resource,
            outcome: self.outcome,
            from: self.start_date,
            to: self.end_date,
            ..AuditFilter::new()
        }
    }
}

/// DELETE /api/admin/logs response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCountResponse {
    pub deleted_count: u64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_resolve_defaults() {
        let page = PageQuery::default().resolve(DEFAULT_USER_PAGE_SIZE);
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, DEFAULT_USER_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_resolve_clamps() {
        let page = Page::resolve(Some(0), Some(10_000), DEFAULT_USER_PAGE_SIZE);
        assert_eq!(page.number, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);

        let page = Page::resolve(Some(3), Some(20), DEFAULT_USER_PAGE_SIZE);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_page_meta() {
        let meta = PageMeta::new(Page { number: 2, limit: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let meta = PageMeta::new(Page { number: 1, limit: 10 }, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);

        let meta = PageMeta::new(Page { number: 3, limit: 10 }, 25);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_logs_query_filter() {
        let query: LogsQuery = serde_urlencoded::from_str(
            "page=2&limit=25&action=failed_login&outcome=failed&severity=medium",
        )
        .unwrap();
        let (page, filter) = query.filter();

        assert_eq!(page.number, 2);
        assert_eq!(filter.offset, 25);
        assert_eq!(filter.limit, 25);
        assert_eq!(filter.action, Some(AuditAction::FailedLogin));
        assert_eq!(filter.outcome, Some(AuditOutcome::Failed));
        assert_eq!(filter.severity, Some(AuditSeverity::Medium));
        assert!(filter.subject.is_none());
    }

    #[test]
    fn test_update_request_privileged_fields() {
        let req = UpdateUserRequest {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(!req.touches_privileged_fields());
        assert!(!req.is_empty());

        let req = UpdateUserRequest {
            role: Some(Role::Manager),
            ..Default::default()
        };
        assert!(req.touches_privileged_fields());

        assert!(UpdateUserRequest::default().is_empty());
    }
}
