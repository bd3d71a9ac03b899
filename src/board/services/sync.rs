//! Reconciliation of super-admin owner memberships.

use super::BoardService;
use crate::board::{
    domain::{BoardId, BoardMembership, MembershipRole},
    ports::BoardRepository,
};
use crate::context::RequestContext;
use crate::error::ServiceResult;
use crate::identity::{domain::UserRole, ports::UserRepository};
use mockable::Clock;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Outcome of a super-admin sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Owner memberships created for super admins who had none.
    pub inserted: usize,
    /// Existing memberships raised to owner.
    pub promoted: usize,
}

impl SyncReport {
    /// Returns `true` when the run changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.inserted == 0 && self.promoted == 0
    }
}

impl<U, B, C> BoardService<U, B, C>
where
    U: UserRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Grants every active super admin an owner membership on a board.
    ///
    /// Missing memberships are inserted and lower roles are promoted. No
    /// membership is ever demoted or removed, so repeated runs are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::PermissionDenied`] unless the
    /// requester is an active owner of the board.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn sync_super_admins(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
    ) -> ServiceResult<SyncReport> {
        let requester = self.active_requester_membership(ctx, board_id).await?;
        crate::authz::membership_rules::can_update_board(requester.role())?;
        self.load_board(board_id).await?;
        self.sync_owners(board_id).await
    }

    async fn sync_owners(&self, board_id: BoardId) -> ServiceResult<SyncReport> {
        let super_admins = self.users.list_active_by_role(UserRole::SuperAdmin).await?;
        let mut existing: HashMap<_, _> = self
            .boards
            .memberships_for_board(board_id)
            .await?
            .into_iter()
            .map(|membership| (membership.user_id(), membership))
            .collect();

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for admin in &super_admins {
            match existing.remove(&admin.id()) {
                None => inserts.push(BoardMembership::new(
                    board_id,
                    admin.id(),
                    MembershipRole::Owner,
                    &*self.clock,
                )),
                Some(mut membership) if !membership.role().is_owner() => {
                    membership.change_role(MembershipRole::Owner, &*self.clock);
                    updates.push(membership);
                }
                Some(_) => {}
            }
        }

        let report = SyncReport {
            inserted: inserts.len(),
            promoted: updates.len(),
        };
        if report.is_noop() {
            debug!("super admins already own the board");
            return Ok(report);
        }
        self.boards
            .apply_membership_changes(&inserts, &updates)
            .await?;
        info!(
            inserted = report.inserted,
            promoted = report.promoted,
            "super admin memberships synced"
        );
        Ok(report)
    }
}
