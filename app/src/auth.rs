//! Typed capability checks for the two gated surfaces.
//!
//! Only user management and data export are permission-gated; every other
//! action in the application is open to any signed-in user, so there is no
//! permission variant for them and no check to consult.

use serde::{Deserialize, Serialize};

use crate::types::{User, UserRole};

/// A gated capability
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create and edit user accounts
    ManageUsers,
    /// Export the ticket collection as CSV
    ExportData,
}

impl UserRole {
    /// Does this role hold the given permission?
    #[must_use]
    pub const fn can(self, permission: Permission) -> bool {
        match permission {
            Permission::ManageUsers | Permission::ExportData => matches!(self, Self::Admin),
        }
    }
}

/// Does the (possibly absent) current user hold the given permission?
#[must_use]
pub fn can(current_user: Option<&User>, permission: Permission) -> bool {
    current_user.is_some_and(|user| user.role.can(permission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn user(role: UserRole) -> User {
        User::new(
            UserId::new(1),
            "Someone".to_string(),
            "someone@example.com".to_string(),
            role,
        )
    }

    #[test]
    fn admins_hold_both_permissions() {
        let admin = user(UserRole::Admin);
        assert!(can(Some(&admin), Permission::ManageUsers));
        assert!(can(Some(&admin), Permission::ExportData));
    }

    #[test]
    fn regular_users_hold_neither() {
        let regular = user(UserRole::User);
        assert!(!can(Some(&regular), Permission::ManageUsers));
        assert!(!can(Some(&regular), Permission::ExportData));
    }

    #[test]
    fn signed_out_holds_nothing() {
        assert!(!can(None, Permission::ExportData));
    }
}
