//! Presentation Layer
//!
//! HTTP handlers, request/response DTOs, the authentication middleware
//! and the router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
