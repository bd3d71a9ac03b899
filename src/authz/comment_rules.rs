//! Comment gates.

use super::{RuleResult, RuleViolation};
use crate::board::domain::MembershipRole;

/// Checks whether the requester may edit a comment. Only the author may.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] for anyone but the author.
pub fn can_edit(is_author: bool) -> RuleResult {
    if is_author {
        return Ok(());
    }
    Err(RuleViolation::denied("non-author", "edit comment"))
}

/// Checks whether the requester may delete a comment.
///
/// # Errors
///
/// Returns [`RuleViolation::PermissionDenied`] unless the requester is the
/// author or holds an owner or editor membership.
pub fn can_delete(requester: MembershipRole, is_author: bool) -> RuleResult {
    match requester {
        _ if is_author => Ok(()),
        MembershipRole::Owner | MembershipRole::Editor => Ok(()),
        MembershipRole::Agent | MembershipRole::Viewer => {
            Err(RuleViolation::denied(requester, "delete comment"))
        }
    }
}
