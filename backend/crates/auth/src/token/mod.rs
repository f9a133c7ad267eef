//! Token Issuance and Verification
//!
//! Dual JWT scheme: short-lived access tokens carry identity and role,
//! long-lived refresh tokens carry only the subject. Both are signed
//! with the same secret and separated by the audience claim, so one can
//! never be replayed as the other.

pub mod claims;
pub mod service;
pub mod signer;

pub use claims::{Claims, TokenKind, ISSUER};
pub use service::TokenService;
pub use signer::{JwtSigner, TokenSigner};
