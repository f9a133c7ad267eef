//! Password Hashing and Verification
//!
//! Adaptive password handling with:
//! - bcrypt hashing (cost factor from configuration)
//! - Zeroization of sensitive data
//! - Unicode NFKC normalization before hashing
//!
//! The hashing algorithm sits behind the [`PasswordHasher`] capability
//! trait so alternate algorithms can be substituted without touching
//! the authentication control flow.

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length (in Unicode code points)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in bytes (bcrypt truncates input beyond 72
/// bytes, which would make longer passwords sharing a prefix verify as
/// equal)
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Default bcrypt cost factor
pub const DEFAULT_HASH_COST: u32 = 12;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} bytes (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped, preventing memory inspection attacks.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Validation rules:
    /// - Minimum [`MIN_PASSWORD_LENGTH`] characters
    /// - Maximum [`MAX_PASSWORD_BYTES`] bytes
    /// - No control characters
    /// - Not empty/whitespace only
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        // Unicode NFKC normalization before processing
        let normalized: String = raw.nfkc().collect();

        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Minimum is counted in Unicode code points
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Maximum is counted in bytes: bcrypt silently truncates input
        // beyond 72 bytes, so anything longer must be rejected up front
        if normalized.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: normalized.len(),
            });
        }

        // Check for control characters (except space, tab, newline)
        for ch in normalized.chars() {
            if ch.is_control() && ch != ' ' && ch != '\t' && ch != '\n' {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing or trusted input)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Get the password as a string slice for hashing
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password string ready for storage
///
/// Stores the bcrypt hash in modular crypt format, which includes the
/// algorithm identifier, cost factor, salt and digest.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a stored hash string (e.g., from database)
    pub fn from_hash_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // bcrypt hashes are "$2<x>$<cost>$<salt+digest>"
        if !hash.starts_with("$2") {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { hash })
    }

    /// Get the hash string for storage
    pub fn as_hash_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// PasswordHasher capability
// ============================================================================

/// Capability interface for password hashing and verification
///
/// Authentication control flow depends on this trait only; the concrete
/// algorithm is chosen at wiring time.
pub trait PasswordHasher: Send + Sync {
    /// Hash a clear text password for storage
    fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError>;

    /// Verify a clear text password against a stored hash
    ///
    /// Returns `false` on mismatch or on an unparseable hash.
    fn verify(&self, password: &ClearTextPassword, hash: &HashedPassword) -> bool;
}

/// bcrypt-backed [`PasswordHasher`]
///
/// The cost factor is configuration, not code: callers pass the value
/// they loaded at startup (default [`DEFAULT_HASH_COST`]).
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with an explicit cost factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Get the configured cost factor
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(password.as_str(), self.cost)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword { hash })
    }

    fn verify(&self, password: &ClearTextPassword, hash: &HashedPassword) -> bool {
        bcrypt::verify(password.as_str(), hash.as_hash_string()).unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the test suite fast; production uses the configured cost.
    fn test_hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("abc".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_BYTES + 1);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_byte_limit_applies_to_multibyte() {
        // 25 three-byte characters: 25 code points but 75 bytes, past
        // the point where bcrypt would truncate
        let multibyte = "あ".repeat(25);
        assert_eq!(multibyte.len(), 75);
        let result = ClearTextPassword::new(multibyte);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));

        // 24 of the same stays within the 72-byte budget
        assert!(ClearTextPassword::new("あ".repeat(24)).is_ok());
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new("".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_characters() {
        let result = ClearTextPassword::new("pass\u{0007}word".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_valid_password() {
        assert!(ClearTextPassword::new("Secret123".to_string()).is_ok());
    }

    #[test]
    fn test_unicode_password() {
        // Unicode passwords should work
        let result = ClearTextPassword::new("パスワード安全です".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let password = ClearTextPassword::new_unchecked("TestPassword123".to_string());
        let hashed = hasher.hash(&password).unwrap();

        // Correct password should verify
        assert!(hasher.verify(&password, &hashed));

        // Wrong password should not verify
        let wrong = ClearTextPassword::new_unchecked("WrongPassword123".to_string());
        assert!(!hasher.verify(&wrong, &hashed));
    }

    #[test]
    fn test_hash_string_roundtrip() {
        let hasher = test_hasher();
        let password = ClearTextPassword::new_unchecked("TestPassword123".to_string());
        let hashed = hasher.hash(&password).unwrap();

        let stored = hashed.as_hash_string().to_string();
        let restored = HashedPassword::from_hash_string(stored).unwrap();

        assert!(hasher.verify(&password, &restored));
    }

    #[test]
    fn test_invalid_hash_string() {
        let result = HashedPassword::from_hash_string("not_a_valid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new_unchecked("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
