//! Audit Sink
//!
//! Writes entries to the audit repository. A write failure is logged
//! and swallowed so that the surrounding auth decision always completes.

use std::sync::Arc;

use crate::audit::entry::AuditEntry;
use crate::domain::repository::AuditLogRepository;

/// Fire-and-forget audit writer
pub struct AuditSink<R>
where
    R: AuditLogRepository,
{
    repo: Arc<R>,
}

impl<R> AuditSink<R>
where
    R: AuditLogRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Record an entry, swallowing any storage error
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.repo.append(&entry).await {
            tracing::warn!(
                action = %entry.action,
                resource = %entry.resource,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }
}

impl<R> Clone for AuditSink<R>
where
    R: AuditLogRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}
