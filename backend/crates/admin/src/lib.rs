//! Admin Backend Module
//!
//! Administrative surface over the user and audit stores: user CRUD,
//! activation toggles and activity-log management. Handlers are thin
//! plumbing; all protection goes through the guards in `auth::authorize`,
//! so the permission matrix and the ownership exemption are exercised by
//! real routes.
//!
//! Clean Architecture structure:
//! - `error.rs` - Admin-specific error variants
//! - `presentation/` - DTOs, HTTP handlers, router

pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use error::{AdminError, AdminResult};
pub use presentation::router::admin_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
