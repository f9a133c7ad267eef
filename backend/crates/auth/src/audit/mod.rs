//! Audit Trail
//!
//! Structured entries for security-relevant events and the sink that
//! writes them. Audit failures are swallowed: a broken trail must never
//! block an authentication or authorization decision.

pub mod entry;
pub mod sink;

pub use entry::{AuditAction, AuditEntry, AuditFilter, AuditOutcome, AuditSeverity};
pub use sink::AuditSink;
