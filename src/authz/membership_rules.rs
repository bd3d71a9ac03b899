//! Board and membership gates.
//!
//! Board mutations and membership management are decided by the acting
//! user's membership role on that board, not by their global role. The
//! only exception is board creation, which needs a global admin role.

use super::{RuleResult, RuleViolation};
use crate::board::domain::{BoardCode, MembershipRole};
use crate::identity::domain::UserRole;

/// Checks whether a user with global role `requester` may create boards.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester is an
/// admin or super admin.
pub fn can_create_board(requester: UserRole) -> RuleResult {
    match requester {
        UserRole::SuperAdmin | UserRole::Admin => Ok(()),
        UserRole::Agent | UserRole::Customer => {
            Err(RuleViolation::denied(requester, "create board"))
        }
    }
}

/// Checks whether the requester's membership allows updating the board.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester owns the
/// board.
pub fn can_update_board(requester: MembershipRole) -> RuleResult {
    require_owner(requester, "update board")
}

/// Checks whether the requester's membership allows deactivating the board.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester owns the
/// board.
pub fn can_deactivate_board(requester: MembershipRole) -> RuleResult {
    require_owner(requester, "deactivate board")
}

/// Checks whether the requester's membership allows adding members.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester owns the
/// board.
pub fn can_create_membership(requester: MembershipRole) -> RuleResult {
    require_owner(requester, "create board membership")
}

/// Checks whether the requester's membership allows changing member roles.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester owns the
/// board.
pub fn can_update_membership(requester: MembershipRole) -> RuleResult {
    require_owner(requester, "update board membership")
}

/// Checks whether the requester's membership allows removing members.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester owns the
/// board.
pub fn can_remove_membership(requester: MembershipRole) -> RuleResult {
    require_owner(requester, "remove board membership")
}

/// Checks that removing a membership with role `target` keeps at least one
/// owner, given the board's current `owner_count`.
///
/// # Errors
///
/// Returns [`RuleViolation::InvalidState`] when `target` is the only owner.
pub fn can_remove_membership_considering_last_owner(
    target: MembershipRole,
    owner_count: u64,
) -> RuleResult {
    if !target.is_owner() || owner_count > 1 {
        return Ok(());
    }
    Err(RuleViolation::invalid_state(
        "cannot remove the last owner of the board",
    ))
}

/// Fails when `exists` reports that `code` is already taken.
///
/// # Errors
///
/// Returns [`RuleViolation::Conflict`] when a board with the code exists.
pub fn board_with_code_exists(code: &BoardCode, exists: bool) -> RuleResult {
    if exists {
        return Err(RuleViolation::conflict(format!(
            "board code '{code}' is already in use"
        )));
    }
    Ok(())
}

/// Checks that a user with global role `user_role` may hold `requested`.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] when the global role caps
/// membership below `requested`.
pub fn can_have_membership_role(user_role: UserRole, requested: MembershipRole) -> RuleResult {
    if allowed_membership_roles(user_role).contains(&requested) {
        return Ok(());
    }
    Err(RuleViolation::denied(
        user_role,
        format!("have a '{requested}' membership"),
    ))
}

/// Returns the membership roles a user with `user_role` may hold.
#[must_use]
pub const fn allowed_membership_roles(user_role: UserRole) -> &'static [MembershipRole] {
    match user_role {
        UserRole::SuperAdmin | UserRole::Admin => &MembershipRole::ALL,
        UserRole::Agent => &[
            MembershipRole::Viewer,
            MembershipRole::Editor,
            MembershipRole::Agent,
        ],
        UserRole::Customer => &[MembershipRole::Viewer],
    }
}

fn require_owner(requester: MembershipRole, action: &str) -> RuleResult {
    if requester.is_owner() {
        return Ok(());
    }
    Err(RuleViolation::denied(requester, action))
}
