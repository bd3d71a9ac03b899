//! Ticket work on a shared board, from triage to discussion.

use super::helpers::{Desk, as_user, desk};
use helpdesk::board::domain::MembershipRole;
use helpdesk::error::ErrorKind;
use helpdesk::identity::domain::AssignableRole;
use helpdesk::paging::PageRequest;
use helpdesk::ticket::{
    domain::{HistoryAction, TicketPriority, TicketStatus},
    services::{CreateTicketRequest, UpdateTicketRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_gains_ticket_rights_only_through_membership(
    desk: Desk,
) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let board = desk.open_board(&admin, "ABCD").await?;
    let customer = desk.hire(&admin, "cust@example.com", AssignableRole::Customer).await?;

    let outsider = desk
        .tickets
        .create_ticket(&as_user(&customer), board.id(), CreateTicketRequest::new("Bug"))
        .await
        .expect_err("no membership yet");
    assert_eq!(outsider.kind(), ErrorKind::PermissionDenied);

    desk.grant(&admin, &board, &customer, MembershipRole::Viewer)
        .await?;
    let viewer = desk
        .tickets
        .create_ticket(&as_user(&customer), board.id(), CreateTicketRequest::new("Bug"))
        .await
        .expect_err("viewers only read");
    assert_eq!(viewer.kind(), ErrorKind::PermissionDenied);

    let capped = desk
        .boards
        .update_membership(
            &as_user(&admin),
            board.id(),
            customer.id(),
            MembershipRole::Agent,
        )
        .await
        .expect_err("customers stay viewers");
    assert_eq!(capped.kind(), ErrorKind::PermissionDenied);

    let agent = desk.hire(&admin, "agent@example.com", AssignableRole::Agent).await?;
    desk.grant(&admin, &board, &agent, MembershipRole::Agent)
        .await?;
    let ticket = desk
        .tickets
        .create_ticket(&as_user(&agent), board.id(), CreateTicketRequest::new("Bug"))
        .await?;
    assert_eq!(ticket.number().code_on(board.code()), "ABCD-1");
    assert_eq!(ticket.reporter_id(), agent.id());

    let read_back = desk
        .tickets
        .get_ticket(&as_user(&customer), board.id(), ticket.id())
        .await?;
    assert_eq!(read_back.title(), "Bug");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn triage_records_history_in_order(desk: Desk) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let board = desk.open_board(&admin, "TRIA").await?;
    let agent = desk.hire(&admin, "agent@example.com", AssignableRole::Agent).await?;
    desk.grant(&admin, &board, &agent, MembershipRole::Agent)
        .await?;
    let ctx = as_user(&admin);

    let ticket = desk
        .tickets
        .create_ticket(&ctx, board.id(), CreateTicketRequest::new("Printer on fire"))
        .await?;
    desk.tickets
        .update_ticket(
            &ctx,
            board.id(),
            ticket.id(),
            UpdateTicketRequest::new()
                .with_status(TicketStatus::Open)
                .with_priority(TicketPriority::Critical)
                .assign_to(agent.id()),
        )
        .await?;
    let closed = desk
        .tickets
        .update_ticket(
            &as_user(&agent),
            board.id(),
            ticket.id(),
            UpdateTicketRequest::new().with_status(TicketStatus::Closed),
        )
        .await?;
    assert_eq!(closed.status(), TicketStatus::Closed);
    assert_eq!(closed.assignee_id(), Some(agent.id()));

    let history = desk
        .tickets
        .list_history(&ctx, board.id(), ticket.id(), PageRequest::default())
        .await?;
    let trail: Vec<_> = history
        .items()
        .iter()
        .map(|entry| (entry.action(), entry.new_value().map(str::to_owned)))
        .collect();
    // Entries written by one update share a timestamp, so only the
    // ordering between updates is fixed.
    let (last, triage) = trail.split_last().expect("history recorded");
    assert_eq!(
        last,
        &(HistoryAction::StatusChanged, Some("closed".to_owned()))
    );
    assert_eq!(triage.len(), 3);
    for expected in [
        (HistoryAction::StatusChanged, Some("open".to_owned())),
        (HistoryAction::PriorityChanged, Some("critical".to_owned())),
        (HistoryAction::AssigneeChanged, Some(agent.id().to_string())),
    ] {
        assert!(triage.contains(&expected), "missing {expected:?}");
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn discussion_respects_authorship_and_moderation(desk: Desk) -> Result<(), eyre::Report> {
    let root = desk.bootstrap_super_admin("root@example.com").await?;
    let admin = desk.hire(&root, "admin@example.com", AssignableRole::Admin).await?;
    let board = desk.open_board(&admin, "TALK").await?;
    let customer = desk.hire(&admin, "cust@example.com", AssignableRole::Customer).await?;
    let agent = desk.hire(&admin, "agent@example.com", AssignableRole::Agent).await?;
    desk.grant(&admin, &board, &customer, MembershipRole::Viewer)
        .await?;
    desk.grant(&admin, &board, &agent, MembershipRole::Agent)
        .await?;

    let ticket = desk
        .tickets
        .create_ticket(&as_user(&agent), board.id(), CreateTicketRequest::new("Login fails"))
        .await?;
    let comment = desk
        .tickets
        .add_comment(&as_user(&customer), board.id(), ticket.id(), "Still broken")
        .await?;

    let foreign_edit = desk
        .tickets
        .update_comment(
            &as_user(&agent),
            board.id(),
            ticket.id(),
            comment.id(),
            "Fixed it for you",
        )
        .await
        .expect_err("only the author edits");
    assert_eq!(foreign_edit.kind(), ErrorKind::PermissionDenied);

    let edited = desk
        .tickets
        .update_comment(
            &as_user(&customer),
            board.id(),
            ticket.id(),
            comment.id(),
            "Still broken after reboot",
        )
        .await?;
    assert!(edited.edited());

    let agent_delete = desk
        .tickets
        .delete_comment(&as_user(&agent), board.id(), ticket.id(), comment.id())
        .await
        .expect_err("agents do not moderate");
    assert_eq!(agent_delete.kind(), ErrorKind::PermissionDenied);

    desk.tickets
        .delete_comment(&as_user(&admin), board.id(), ticket.id(), comment.id())
        .await?;
    let remaining = desk
        .tickets
        .list_comments(&as_user(&customer), board.id(), ticket.id(), PageRequest::default())
        .await?;
    assert!(remaining.items().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_board_freezes_ticket_work(desk: Desk) -> Result<(), eyre::Report> {
    let admin = desk.bootstrap_super_admin("root@example.com").await?;
    let board = desk.open_board(&admin, "FRZN").await?;
    let ctx = as_user(&admin);
    let ticket = desk
        .tickets
        .create_ticket(&ctx, board.id(), CreateTicketRequest::new("Before freeze"))
        .await?;
    desk.boards.deactivate_board(&ctx, board.id()).await?;

    let frozen = desk
        .tickets
        .add_comment(&ctx, board.id(), ticket.id(), "Anyone?")
        .await
        .expect_err("board is inactive");
    assert_eq!(frozen.kind(), ErrorKind::InvalidState);
    Ok(())
}
