//! Value Objects
//!
//! Validated wrapper types for domain values.

pub mod display_name;
pub mod email;
pub mod refresh_token;
pub mod user_id;
pub mod user_password;
pub mod user_role;
