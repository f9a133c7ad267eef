use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to every user
///
/// The role is the sole input to the permission matrix; there are no
/// per-user permission overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Manager = 1,
    Admin = 2,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            User => "user",
            Manager => "manager",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_manager_or_higher(&self) -> bool {
        use Role::*;
        matches!(self, Manager | Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use Role::*;
        match id {
            0 => User,
            1 => Manager,
            2 => Admin,
            _ => {
                tracing::error!("Invalid Role id: {}", id);
                unreachable!("Invalid Role id: {}", id)
            }
        }
    }

    /// Parse a role code from request input
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "user" => Some(User),
            "manager" => Some(Manager),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_id() {
        assert_eq!(Role::from_id(0), Role::User);
        assert_eq!(Role::from_id(1), Role::Manager);
        assert_eq!(Role::from_id(2), Role::Admin);
    }

    #[test]
    fn test_role_from_code() {
        assert_eq!(Role::from_code("user"), Some(Role::User));
        assert_eq!(Role::from_code("manager"), Some(Role::Manager));
        assert_eq!(Role::from_code("admin"), Some(Role::Admin));
        assert_eq!(Role::from_code("superuser"), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Manager.to_string(), "manager");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_checks() {
        assert!(!Role::User.is_manager_or_higher());
        assert!(Role::Manager.is_manager_or_higher());
        assert!(Role::Admin.is_manager_or_higher());
        assert!(!Role::Manager.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn test_role_serde_codes() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
