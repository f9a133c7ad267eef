//! Audit Entry
//!
//! One recorded security event: who, what, from where, and how it went.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::permission::Resource;
use crate::domain::value_object::user_id::{AuditLogId, UserId};
use platform::client::RequestClient;

/// Recorded event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Signup,
    PasswordChange,
    ProfileUpdate,
    RoleChange,
    UserCreate,
    UserUpdate,
    UserDelete,
    UserActivate,
    UserDeactivate,
    TokenRefresh,
    FailedLogin,
    AccountLocked,
    PermissionDenied,
    DataExport,
    SettingsChange,
}

impl AuditAction {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use AuditAction::*;
        match self {
            Login => "login",
            Logout => "logout",
            Signup => "signup",
            PasswordChange => "password_change",
            ProfileUpdate => "profile_update",
            RoleChange => "role_change",
            UserCreate => "user_create",
            UserUpdate => "user_update",
            UserDelete => "user_delete",
            UserActivate => "user_activate",
            UserDeactivate => "user_deactivate",
            TokenRefresh => "token_refresh",
            FailedLogin => "failed_login",
            AccountLocked => "account_locked",
            PermissionDenied => "permission_denied",
            DataExport => "data_export",
            SettingsChange => "settings_change",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use AuditAction::*;
        match code {
            "login" => Some(Login),
            "logout" => Some(Logout),
            "signup" => Some(Signup),
            "password_change" => Some(PasswordChange),
            "profile_update" => Some(ProfileUpdate),
            "role_change" => Some(RoleChange),
            "user_create" => Some(UserCreate),
            "user_update" => Some(UserUpdate),
            "user_delete" => Some(UserDelete),
            "user_activate" => Some(UserActivate),
            "user_deactivate" => Some(UserDeactivate),
            "token_refresh" => Some(TokenRefresh),
            "failed_login" => Some(FailedLogin),
            "account_locked" => Some(AccountLocked),
            "permission_denied" => Some(PermissionDenied),
            "data_export" => Some(DataExport),
            "settings_change" => Some(SettingsChange),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the recorded operation concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    #[default]
    Success,
    Failed,
    Warning,
}

impl AuditOutcome {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failed => "failed",
            AuditOutcome::Warning => "warning",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "success" => Some(AuditOutcome::Success),
            "failed" => Some(AuditOutcome::Failed),
            "warning" => Some(AuditOutcome::Warning),
            _ => None,
        }
    }
}

/// Severity grade for triage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl AuditSeverity {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AuditSeverity::Low => "low",
            AuditSeverity::Medium => "medium",
            AuditSeverity::High => "high",
            AuditSeverity::Critical => "critical",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "low" => Some(AuditSeverity::Low),
            "medium" => Some(AuditSeverity::Medium),
            "high" => Some(AuditSeverity::High),
            "critical" => Some(AuditSeverity::Critical),
            _ => None,
        }
    }
}

/// One audit trail entry
///
/// `subject` is the user the event is about; `None` when the event has
/// no resolvable user, e.g. a failed login for an unknown email (the
/// attempted email goes into `details` instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditLogId,
    pub subject: Option<UserId>,
    pub action: AuditAction,
    pub resource: Resource,
    pub details: Map<String, Value>,
    pub source_address: String,
    pub user_agent: Option<String>,
    pub outcome: AuditOutcome,
    pub severity: AuditSeverity,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create an entry stamped with the request client
    ///
    /// Defaults to `Success` / `Low`; callers escalate as needed.
    pub fn new(
        subject: Option<UserId>,
        action: AuditAction,
        resource: Resource,
        client: &RequestClient,
    ) -> Self {
        Self {
            id: AuditLogId::new(),
            subject,
            action,
            resource,
            details: Map::new(),
            source_address: client.ip_string(),
            user_agent: client.user_agent.clone(),
            outcome: AuditOutcome::default(),
            severity: AuditSeverity::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach a contextual detail
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Filter for listing audit entries
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub subject: Option<UserId>,
    pub action: Option<AuditAction>,
    pub resource: Option<Resource>,
    pub outcome: Option<AuditOutcome>,
    pub severity: Option<AuditSeverity>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

impl AuditFilter {
    /// Default page size for log listings
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn new() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            ..Default::default()
        }
    }
}
