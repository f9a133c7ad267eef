//! Application Layer
//!
//! Use cases orchestrating domain logic, token issuance and auditing.

pub mod config;
pub mod profile;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

pub use profile::ProfileUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};

use crate::domain::entity::user::User;

/// Output shared by signup and login: the user plus a fresh token pair
pub struct AuthOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}
