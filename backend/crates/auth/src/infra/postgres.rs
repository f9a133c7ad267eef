//! PostgreSQL Repository Implementations
//!
//! One repository implements both traits: users (with the embedded
//! refresh token list as jsonb) and the audit trail.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::entry::{AuditAction, AuditEntry, AuditFilter, AuditOutcome, AuditSeverity};
use crate::domain::entity::user::User;
use crate::domain::permission::Resource;
use crate::domain::repository::{AuditLogRepository, AuditStats, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    refresh_token::RefreshTokenEntry,
    user_id::{AuditLogId, UserId},
    user_password::UserPassword,
    user_role::Role,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop refresh token entries older than the retention period
    ///
    /// Startup sweep; day-to-day pruning happens inline on login and
    /// refresh.
    pub async fn cleanup_expired_refresh_tokens(&self, retention_secs: f64) -> AuthResult<u64> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET refresh_tokens = COALESCE(
                (
                    SELECT jsonb_agg(e)
                    FROM jsonb_array_elements(refresh_tokens) e
                    WHERE (e->>'issuedAt')::timestamptz > now() - make_interval(secs => $1)
                ),
                '[]'::jsonb
            )
            WHERE refresh_tokens <> '[]'::jsonb
            "#,
        )
        .bind(retention_secs)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(users_updated = updated, "Pruned expired refresh tokens");

        Ok(updated)
    }
}

/// Map an insert error, translating the unique email index violation
fn map_insert_err(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return AuthError::DuplicateEmail;
        }
    }
    AuthError::Database(e)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert(&self, user: &User) -> AuthResult<()> {
        let tokens = serde_json::to_value(&user.refresh_tokens)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                display_name,
                password_hash,
                user_role,
                is_active,
                failed_attempts,
                last_failed_at,
                last_login_at,
                last_login_ip,
                refresh_tokens,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.id())
        .bind(user.is_active)
        .bind(user.failed_attempts as i16)
        .bind(user.last_failed_at)
        .bind(user.last_login_at)
        .bind(&user.last_login_ip)
        .bind(tokens)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE user_id = $1",
            UserRow::SELECT
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE email = $1",
            UserRow::SELECT
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_refresh_token(&self, token: &str) -> AuthResult<Option<User>> {
        // jsonb containment on the token list
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE refresh_tokens @> jsonb_build_array(jsonb_build_object('token', $1::text))",
            UserRow::SELECT
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{} ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            UserRow::SELECT
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn count(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let tokens = serde_json::to_value(&user.refresh_tokens)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                display_name = $3,
                password_hash = $4,
                user_role = $5,
                is_active = $6,
                failed_attempts = $7,
                last_failed_at = $8,
                last_login_at = $9,
                last_login_ip = $10,
                refresh_tokens = $11,
                updated_at = $12
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.id())
        .bind(user.is_active)
        .bind(user.failed_attempts as i16)
        .bind(user.last_failed_at)
        .bind(user.last_login_at)
        .bind(&user.last_login_ip)
        .bind(tokens)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Audit Log Repository Implementation
// ============================================================================

/// Shared filter clause; `$1..$7` are the optional filter binds
const AUDIT_FILTER_WHERE: &str = r#"
    ($1::uuid IS NULL OR subject_user_id = $1)
    AND ($2::text IS NULL OR action = $2)
    AND ($3::text IS NULL OR resource = $3)
    AND ($4::text IS NULL OR outcome = $4)
    AND ($5::text IS NULL OR severity = $5)
    AND ($6::timestamptz IS NULL OR created_at >= $6)
    AND ($7::timestamptz IS NULL OR created_at <= $7)
"#;

/// Bind the seven optional filter parameters in declaration order
macro_rules! bind_audit_filter {
    ($query:expr, $filter:expr) => {
        $query
            .bind($filter.subject.map(|s| s.into_uuid()))
            .bind($filter.action.map(|a| a.code()))
            .bind($filter.resource.map(|r| r.code()))
            .bind($filter.outcome.map(|o| o.code()))
            .bind($filter.severity.map(|s| s.code()))
            .bind($filter.from)
            .bind($filter.to)
    };
}

impl AuditLogRepository for PgAuthRepository {
    async fn append(&self, entry: &AuditEntry) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                audit_id,
                subject_user_id,
                action,
                resource,
                details,
                source_address,
                user_agent,
                outcome,
                severity,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.subject.map(|s| s.into_uuid()))
        .bind(entry.action.code())
        .bind(entry.resource.code())
        .bind(serde_json::Value::Object(entry.details.clone()))
        .bind(&entry.source_address)
        .bind(&entry.user_agent)
        .bind(entry.outcome.code())
        .bind(entry.severity.code())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_entries(&self, filter: &AuditFilter) -> AuthResult<Vec<AuditEntry>> {
        let sql = format!(
            r#"
            SELECT
                audit_id,
                subject_user_id,
                action,
                resource,
                details,
                source_address,
                user_agent,
                outcome,
                severity,
                created_at
            FROM audit_logs
            WHERE {AUDIT_FILTER_WHERE}
            ORDER BY created_at DESC
            OFFSET $8 LIMIT $9
            "#
        );

        let rows = bind_audit_filter!(sqlx::query_as::<_, AuditLogRow>(&sql), filter)
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_entry()).collect()
    }

    async fn count_entries(&self, filter: &AuditFilter) -> AuthResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM audit_logs WHERE {AUDIT_FILTER_WHERE}");

        let count = bind_audit_filter!(sqlx::query_scalar::<_, i64>(&sql), filter)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn stats(&self, filter: &AuditFilter) -> AuthResult<AuditStats> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE outcome = 'success') AS success,
                COUNT(*) FILTER (WHERE outcome = 'failed') AS failed,
                COUNT(*) FILTER (WHERE outcome = 'warning') AS warning
            FROM audit_logs
            WHERE {AUDIT_FILTER_WHERE}
            "#
        );

        let row = bind_audit_filter!(sqlx::query_as::<_, AuditStatsRow>(&sql), filter)
            .fetch_one(&self.pool)
            .await?;

        Ok(AuditStats {
            total: row.total,
            success: row.success,
            failed: row.failed,
            warning: row.warning,
        })
    }

    async fn delete_entry(&self, id: &AuditLogId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM audit_logs WHERE audit_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_entries(&self, filter: &AuditFilter) -> AuthResult<u64> {
        let sql = format!("DELETE FROM audit_logs WHERE {AUDIT_FILTER_WHERE}");

        let deleted = bind_audit_filter!(sqlx::query(&sql), filter)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    user_role: i16,
    is_active: bool,
    failed_attempts: i16,
    last_failed_at: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    last_login_ip: Option<String>,
    refresh_tokens: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    const SELECT: &'static str = r#"
        SELECT
            user_id,
            email,
            display_name,
            password_hash,
            user_role,
            is_active,
            failed_attempts,
            last_failed_at,
            last_login_at,
            last_login_ip,
            refresh_tokens,
            created_at,
            updated_at
        FROM users
    "#;

    fn into_user(self) -> AuthResult<User> {
        let password_hash = UserPassword::from_db(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        let refresh_tokens: Vec<RefreshTokenEntry> = serde_json::from_value(self.refresh_tokens)
            .map_err(|e| AuthError::Internal(format!("Invalid refresh token list: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            display_name: DisplayName::from_db(self.display_name),
            password_hash,
            role: Role::from_id(self.user_role),
            is_active: self.is_active,
            failed_attempts: self.failed_attempts as u16,
            last_failed_at: self.last_failed_at,
            last_login_at: self.last_login_at,
            last_login_ip: self.last_login_ip,
            refresh_tokens,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    audit_id: Uuid,
    subject_user_id: Option<Uuid>,
    action: String,
    resource: String,
    details: serde_json::Value,
    source_address: String,
    user_agent: Option<String>,
    outcome: String,
    severity: String,
    created_at: DateTime<Utc>,
}

impl AuditLogRow {
    fn into_entry(self) -> AuthResult<AuditEntry> {
        let action = AuditAction::from_code(&self.action)
            .ok_or_else(|| AuthError::Internal(format!("Invalid audit action: {}", self.action)))?;
        let resource = Resource::from_code(&self.resource).ok_or_else(|| {
            AuthError::Internal(format!("Invalid audit resource: {}", self.resource))
        })?;
        let outcome = AuditOutcome::from_code(&self.outcome).ok_or_else(|| {
            AuthError::Internal(format!("Invalid audit outcome: {}", self.outcome))
        })?;
        let severity = AuditSeverity::from_code(&self.severity).ok_or_else(|| {
            AuthError::Internal(format!("Invalid audit severity: {}", self.severity))
        })?;

        let details = match self.details {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(AuditEntry {
            id: AuditLogId::from_uuid(self.audit_id),
            subject: self.subject_user_id.map(UserId::from_uuid),
            action,
            resource,
            details,
            source_address: self.source_address,
            user_agent: self.user_agent,
            outcome,
            severity,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditStatsRow {
    total: i64,
    success: i64,
    failed: i64,
    warning: i64,
}
