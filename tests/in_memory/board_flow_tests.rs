//! Board lifecycle, membership and super-admin reconciliation.

use super::helpers::{Desk, as_user, desk};
use helpdesk::board::{
    domain::{BoardStatus, MembershipRole},
    services::{CreateMembershipRequest, UpdateBoardRequest},
};
use helpdesk::error::ErrorKind;
use helpdesk::identity::{
    domain::{AssignableRole, EmailAddress, NewUser, User, UserRole},
    ports::UserRepository,
};
use helpdesk::paging::PageRequest;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_board_is_owned_by_creator_and_super_admins(desk: Desk) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let board = desk.open_board(&admin, "abcd").await?;

    assert_eq!(board.code().as_str(), "ABCD");
    let members = desk
        .boards
        .list_memberships(&as_user(&admin), board.id(), PageRequest::default())
        .await?;
    let mut owners: Vec<_> = members
        .items()
        .iter()
        .filter(|m| m.role() == MembershipRole::Owner)
        .map(|m| m.user_id())
        .collect();
    owners.sort();
    let mut expected = vec![root.id(), admin.id()];
    expected.sort();
    assert_eq!(owners, expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boards_are_listed_per_member(desk: Desk) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let customer = desk.hire(&admin, "cust@example.com", AssignableRole::Customer).await?;
    let first = desk.open_board(&admin, "FRST").await?;
    desk.open_board(&admin, "SCND").await?;
    desk.grant(&admin, &first, &customer, MembershipRole::Viewer)
        .await?;

    let visible = desk
        .boards
        .list_boards(&as_user(&customer), PageRequest::default())
        .await?;
    let codes: Vec<_> = visible
        .items()
        .iter()
        .map(|b| b.code().as_str().to_owned())
        .collect();
    assert_eq!(codes, vec!["FRST".to_owned()]);

    let everything = desk
        .boards
        .list_boards(&as_user(&root), PageRequest::default())
        .await?;
    assert_eq!(everything.total(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_super_admin_joins_after_explicit_sync(desk: Desk) -> Result<(), eyre::Report> {
    let admin = desk.bootstrap_super_admin("first@example.com").await?;
    let board = desk.open_board(&admin, "SYNC").await?;

    let late = User::new(
        NewUser {
            email: EmailAddress::new("late@example.com")?,
            password_hash: "$argon2id$late".to_owned(),
            full_name: "Late Root".to_owned(),
            role: UserRole::SuperAdmin,
        },
        &DefaultClock,
    )?;
    desk.users.store(&late).await?;

    let denied = desk
        .boards
        .get_board(&as_user(&late), board.id())
        .await
        .expect_err("not yet a member");
    assert_eq!(denied.kind(), ErrorKind::PermissionDenied);

    let report = desk
        .boards
        .sync_super_admins(&as_user(&admin), board.id())
        .await?;
    assert_eq!((report.inserted, report.promoted), (1, 0));

    let seen = desk.boards.get_board(&as_user(&late), board.id()).await?;
    assert_eq!(seen.id(), board.id());

    let again = desk
        .boards
        .sync_super_admins(&as_user(&late), board.id())
        .await?;
    assert!(again.is_noop());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ownership_handover_keeps_an_owner(desk: Desk) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let board = desk.open_board(&admin, "HAND").await?;

    // The super admin may leave while the creator still owns the board.
    desk.boards
        .remove_membership(&as_user(&admin), board.id(), root.id())
        .await?;
    let last = desk
        .boards
        .remove_membership(&as_user(&admin), board.id(), admin.id())
        .await
        .expect_err("sole owner must stay");
    assert_eq!(last.kind(), ErrorKind::InvalidState);

    let successor = desk.hire(&root, "next@example.com", AssignableRole::Admin).await?;
    desk.boards
        .create_membership(
            &as_user(&admin),
            board.id(),
            CreateMembershipRequest::new(successor.id(), MembershipRole::Owner),
        )
        .await?;
    desk.boards
        .remove_membership(&as_user(&successor), board.id(), admin.id())
        .await?;

    let orphaned = desk
        .boards
        .get_board(&as_user(&admin), board.id())
        .await
        .expect_err("former owner lost access");
    assert_eq!(orphaned.kind(), ErrorKind::PermissionDenied);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivation_is_idempotent_and_reversible(desk: Desk) -> Result<(), eyre::Report> {
    let admin = desk.bootstrap_super_admin("root@example.com").await?;
    let board = desk.open_board(&admin, "IDEM").await?;
    let ctx = as_user(&admin);

    let first = desk.boards.deactivate_board(&ctx, board.id()).await?;
    let second = desk.boards.deactivate_board(&ctx, board.id()).await?;
    assert_eq!(first.status(), BoardStatus::Inactive);
    assert_eq!(second.updated_at(), first.updated_at());

    let revived = desk
        .boards
        .update_board(&ctx, board.id(), UpdateBoardRequest::new().reactivate())
        .await?;
    assert!(revived.is_active());
    Ok(())
}
