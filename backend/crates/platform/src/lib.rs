//! Platform - Reusable technical capabilities
//!
//! Infrastructure-level building blocks with no domain knowledge:
//! - `password`: adaptive password hashing behind a capability trait
//! - `client`: source address / user agent extraction from HTTP headers
//! - `bearer`: Authorization header parsing

pub mod bearer;
pub mod client;
pub mod password;
