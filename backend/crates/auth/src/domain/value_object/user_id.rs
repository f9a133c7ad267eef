//! User ID Value Object
//!
//! Typed identifiers come from the kernel's `Id<T>` marker system.

pub use kernel::id::{AuditLogId, UserId};
