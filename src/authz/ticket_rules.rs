//! Ticket gates.
//!
//! Create and edit gates look at the requester's membership role;
//! reporter and assignee gates look at the target's.

use super::{RuleResult, RuleViolation};
use crate::board::domain::MembershipRole;

/// Checks whether the requester may create tickets on the board.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] for viewers.
pub fn can_create_ticket(requester: MembershipRole) -> RuleResult {
    forbid_viewer(requester, "create ticket")
}

/// Checks whether the requester may edit tickets on the board.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] for viewers.
pub fn can_edit_ticket(requester: MembershipRole) -> RuleResult {
    forbid_viewer(requester, "edit ticket")
}

/// Checks whether a member with role `target` may be a ticket's reporter.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] for viewers.
pub fn can_be_reporter(target: MembershipRole) -> RuleResult {
    forbid_viewer(target, "be reporter")
}

/// Checks whether a member with role `target` may be assigned a ticket.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless `target` is an agent
/// or owner.
pub fn can_be_assigned(target: MembershipRole) -> RuleResult {
    match target {
        MembershipRole::Agent | MembershipRole::Owner => Ok(()),
        MembershipRole::Viewer | MembershipRole::Editor => {
            Err(RuleViolation::denied(target, "be assigned"))
        }
    }
}

fn forbid_viewer(role: MembershipRole, action: &str) -> RuleResult {
    if role == MembershipRole::Viewer {
        return Err(RuleViolation::denied(role, action));
    }
    Ok(())
}
