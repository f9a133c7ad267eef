//! Permission Matrix
//!
//! Static role to permission mapping. The matrix is compiled in; roles
//! and grants change only with a deployment, never at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::user_role::Role;

/// Resource categories
///
/// The permission matrix grants over `Users`, `Stats`, `Logs` and
/// `Profile`; the remaining variants exist for audit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Auth,
    Users,
    Profile,
    Logs,
    Stats,
    System,
    Settings,
}

impl Resource {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Resource::*;
        match self {
            Auth => "auth",
            Users => "users",
            Profile => "profile",
            Logs => "logs",
            Stats => "stats",
            System => "system",
            Settings => "settings",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Resource::*;
        match code {
            "auth" => Some(Auth),
            "users" => Some(Users),
            "profile" => Some(Profile),
            "logs" => Some(Logs),
            "stats" => Some(Stats),
            "system" => Some(System),
            "settings" => Some(Settings),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Actions a role may hold on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Export,
}

impl Action {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Action::*;
        match self {
            Create => "create",
            Read => "read",
            Update => "update",
            Delete => "delete",
            Export => "export",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether `role` holds `action` on `resource`
///
/// Admin holds full user management plus log deletion; Manager is
/// read-leaning (no user create/delete, no log delete); User holds
/// nothing beyond their own profile.
pub const fn allows(role: Role, resource: Resource, action: Action) -> bool {
    use Action::*;
    use Resource::*;

    match role {
        Role::Admin => match (resource, action) {
            (Users, Create | Read | Update | Delete) => true,
            (Stats, Read) => true,
            (Logs, Read | Delete | Export) => true,
            (Profile, Read | Update) => true,
            _ => false,
        },
        Role::Manager => match (resource, action) {
            (Users, Read | Update) => true,
            (Stats, Read) => true,
            (Logs, Read | Export) => true,
            (Profile, Read | Update) => true,
            _ => false,
        },
        Role::User => matches!((resource, action), (Profile, Read | Update)),
    }
}

/// List the grants a role holds, as `resource:action` codes
///
/// Used by the profile endpoint so clients can shape their UI.
pub fn grants_for(role: Role) -> Vec<String> {
    const RESOURCES: [Resource; 4] = [
        Resource::Users,
        Resource::Stats,
        Resource::Logs,
        Resource::Profile,
    ];
    const ACTIONS: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Export,
    ];

    let mut grants = Vec::new();
    for resource in RESOURCES {
        for action in ACTIONS {
            if allows(role, resource, action) {
                grants.push(format!("{}:{}", resource.code(), action.code()));
            }
        }
    }
    grants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_grants() {
        assert!(allows(Role::Admin, Resource::Users, Action::Create));
        assert!(allows(Role::Admin, Resource::Users, Action::Delete));
        assert!(allows(Role::Admin, Resource::Logs, Action::Delete));
        assert!(allows(Role::Admin, Resource::Logs, Action::Export));
        assert!(allows(Role::Admin, Resource::Stats, Action::Read));
    }

    #[test]
    fn test_manager_grants() {
        assert!(allows(Role::Manager, Resource::Users, Action::Read));
        assert!(allows(Role::Manager, Resource::Users, Action::Update));
        assert!(!allows(Role::Manager, Resource::Users, Action::Create));
        assert!(!allows(Role::Manager, Resource::Users, Action::Delete));
        assert!(allows(Role::Manager, Resource::Logs, Action::Export));
        // Log deletion stays admin-only
        assert!(!allows(Role::Manager, Resource::Logs, Action::Delete));
    }

    #[test]
    fn test_user_grants() {
        assert!(allows(Role::User, Resource::Profile, Action::Read));
        assert!(allows(Role::User, Resource::Profile, Action::Update));
        assert!(!allows(Role::User, Resource::Users, Action::Read));
        assert!(!allows(Role::User, Resource::Stats, Action::Read));
        assert!(!allows(Role::User, Resource::Logs, Action::Read));
    }

    #[test]
    fn test_unknown_combination_is_denied() {
        // Export on a resource that never grants it
        assert!(!allows(Role::Admin, Resource::Stats, Action::Export));
        assert!(!allows(Role::Admin, Resource::Profile, Action::Delete));
    }

    #[test]
    fn test_grants_listing() {
        let grants = grants_for(Role::User);
        assert_eq!(grants, vec!["profile:read", "profile:update"]);

        let admin = grants_for(Role::Admin);
        assert!(admin.contains(&"users:delete".to_string()));
        assert!(admin.contains(&"logs:delete".to_string()));
    }
}
