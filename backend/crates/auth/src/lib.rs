//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User signup/login with email + password
//! - Dual JWT tokens (short-lived access, long-lived refresh with rotation)
//! - Role-based access (User, Manager, Admin) over a static permission matrix
//! - Audit trail for every security-relevant decision
//!
//! ## Security Model
//! - Passwords hashed with bcrypt (cost factor from configuration)
//! - Sliding-window lockout after repeated login failures
//! - Refresh tokens are single use; each refresh rotates the token
//! - Access and refresh tokens are audience-separated and never interchangeable

pub mod application;
pub mod audit;
pub mod authorize;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
