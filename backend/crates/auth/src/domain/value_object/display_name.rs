//! Display Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Minimum display name length (in Unicode code points)
const NAME_MIN_LENGTH: usize = 2;

/// Maximum display name length (in Unicode code points)
const NAME_MAX_LENGTH: usize = 50;

/// Human-readable user name shown in the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new display name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        let char_count = name.chars().count();

        if char_count < NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {} characters",
                NAME_MIN_LENGTH
            )));
        }

        if char_count > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_valid() {
        assert!(DisplayName::new("Alice").is_ok());
        assert!(DisplayName::new("山田 太郎").is_ok());
        assert!(DisplayName::new("ab").is_ok());
    }

    #[test]
    fn test_display_name_too_short() {
        assert!(DisplayName::new("a").is_err());
        assert!(DisplayName::new("").is_err());
        assert!(DisplayName::new("   ").is_err()); // Trimmed to empty
    }

    #[test]
    fn test_display_name_too_long() {
        assert!(DisplayName::new("x".repeat(51)).is_err());
        assert!(DisplayName::new("x".repeat(50)).is_ok());
    }

    #[test]
    fn test_display_name_trimmed() {
        let name = DisplayName::new("  Alice  ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }
}
