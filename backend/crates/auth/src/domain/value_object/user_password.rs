//! User Password Value Objects
//!
//! `RawPassword` is the policy-checked clear text form that exists only
//! for the duration of a request. `UserPassword` is the stored hash.
//! The hashing algorithm itself lives behind `platform::password::PasswordHasher`.

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordHasher, PasswordPolicyError,
};

/// Clear text password, validated against the password policy
///
/// Zeroized on drop via the inner `ClearTextPassword`.
#[derive(Debug)]
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create from user input with policy validation
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    fn clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}

/// Hashed password ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with the configured hasher
    pub fn from_raw(
        raw: &RawPassword,
        hasher: &dyn PasswordHasher,
    ) -> Result<Self, PasswordHashError> {
        Ok(Self(hasher.hash(raw.clear_text())?))
    }

    /// Create from a stored hash string
    pub fn from_db(hash: impl Into<String>) -> Result<Self, PasswordHashError> {
        Ok(Self(HashedPassword::from_hash_string(hash)?))
    }

    /// Get the hash string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_hash_string()
    }

    /// Verify a raw password against this hash
    ///
    /// Returns `false` on mismatch; never errors out of the login flow.
    pub fn verify(&self, raw: &RawPassword, hasher: &dyn PasswordHasher) -> bool {
        hasher.verify(raw.clear_text(), &self.0)
    }
}
