//! Which global role may manage which account.
//!
//! A super admin manages everyone. An admin manages everyone except super
//! admins and can never hand out the super-admin role. Agents and customers
//! manage nobody.

use super::{RuleResult, RuleViolation};
use crate::identity::domain::{AssignableRole, UserRole};

/// Checks whether `requester` may create an account with role `new_role`.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] when the requester's role does
/// not allow it.
pub fn can_create_user(requester: UserRole, new_role: UserRole) -> RuleResult {
    manage(requester, new_role, || format!("create '{new_role}' user"))
}

/// Checks whether `requester` may update an account with role `target`.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] when the requester's role does
/// not allow it.
pub fn can_update_user(requester: UserRole, target: UserRole) -> RuleResult {
    manage(requester, target, || format!("update '{target}' user"))
}

/// Checks whether `requester` may change an account's role from `current`
/// to `new_role`.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] when an admin touches a super
/// admin, an admin assigns the super-admin role, or the requester manages
/// nobody.
pub fn can_update_user_role(
    requester: UserRole,
    current: UserRole,
    new_role: UserRole,
) -> RuleResult {
    match (requester, current, new_role) {
        (UserRole::SuperAdmin, _, _) => Ok(()),
        (UserRole::Admin, UserRole::SuperAdmin, _) => {
            Err(RuleViolation::denied(requester, "modify a super admin"))
        }
        (UserRole::Admin, _, UserRole::SuperAdmin) => {
            Err(RuleViolation::denied(requester, "assign the super_admin role"))
        }
        (UserRole::Admin, _, _) => Ok(()),
        (UserRole::Agent | UserRole::Customer, _, _) => Err(RuleViolation::denied(
            requester,
            format!("update role for '{current}' user"),
        )),
    }
}

/// Checks whether `requester` may deactivate an account with role `target`.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] when the requester's role does
/// not allow it.
pub fn can_deactivate_user(requester: UserRole, target: UserRole) -> RuleResult {
    manage(requester, target, || format!("deactivate '{target}' user"))
}

/// Maps a caller-supplied role onto the internal role set.
///
/// [`AssignableRole`] has no super-admin variant, so ordinary calls cannot
/// escalate an account to super admin.
#[must_use]
pub const fn map_role(role: AssignableRole) -> UserRole {
    match role {
        AssignableRole::Admin => UserRole::Admin,
        AssignableRole::Agent => UserRole::Agent,
        AssignableRole::Customer => UserRole::Customer,
    }
}

fn manage(requester: UserRole, target: UserRole, action: impl FnOnce() -> String) -> RuleResult {
    match (requester, target) {
        (UserRole::SuperAdmin, _) => Ok(()),
        (UserRole::Admin, target_role) if target_role != UserRole::SuperAdmin => Ok(()),
        _ => Err(RuleViolation::denied(requester, action())),
    }
}
