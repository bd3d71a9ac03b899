//! Ticket, comment and history persistence against `PostgreSQL`.

use crate::postgres::helpers::{
    CleanupGuard, Stores, ensure_template, seed_user, setup_pool, test_runtime,
};
use helpdesk::board::services::CreateBoardRequest;
use helpdesk::context::RequestContext;
use helpdesk::identity::domain::UserRole;
use helpdesk::paging::PageRequest;
use helpdesk::ticket::{
    domain::{HistoryAction, NewTicket, Ticket, TicketNumber, TicketPriority, TicketStatus},
    ports::{TicketRepository, TicketRepositoryError},
    services::{CreateTicketRequest, UpdateTicketRequest},
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn numbers_increase_per_board_and_collide_on_reuse(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_ticket_numbers_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let boards = stores.board_service();
    let tickets = stores.ticket_service();
    let rt = test_runtime();

    let admin = seed_user(&rt, &stores.users, "admin@example.com", UserRole::Admin)
        .expect("seed admin");
    let ctx = RequestContext::new(admin.id());
    let board = rt
        .block_on(boards.create_board(&ctx, CreateBoardRequest::new("NUMS", "Numbers", "")))
        .expect("board");
    let other = rt
        .block_on(boards.create_board(&ctx, CreateBoardRequest::new("OTHR", "Other", "")))
        .expect("other board");

    for title in ["one", "two"] {
        rt.block_on(tickets.create_ticket(&ctx, board.id(), CreateTicketRequest::new(title)))
            .expect("ticket");
    }
    let elsewhere = rt
        .block_on(tickets.create_ticket(&ctx, other.id(), CreateTicketRequest::new("first")))
        .expect("ticket on other board");
    assert_eq!(elsewhere.number(), TicketNumber::FIRST);

    let listed = rt
        .block_on(tickets.list_tickets(&ctx, board.id(), PageRequest::default()))
        .expect("list");
    let numbers: Vec<_> = listed.items().iter().map(|t| t.number().get()).collect();
    assert_eq!(numbers, vec![1, 2]);

    let stale = Ticket::new(
        NewTicket {
            board_id: board.id(),
            number: TicketNumber::new(2).expect("number"),
            title: "raced".to_owned(),
            description: String::new(),
            created_by: admin.id(),
            assignee_id: None,
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
        },
        &DefaultClock,
    )
    .expect("ticket");
    let result = rt.block_on(stores.tickets.store(&stale));
    assert!(
        matches!(result, Err(TicketRepositoryError::DuplicateNumber { .. })),
        "expected duplicate number, got {result:?}"
    );
}

#[rstest]
fn updates_comments_and_history_persist(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_ticket_history_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let boards = stores.board_service();
    let tickets = stores.ticket_service();
    let rt = test_runtime();

    let admin = seed_user(&rt, &stores.users, "admin@example.com", UserRole::Admin)
        .expect("seed admin");
    let ctx = RequestContext::new(admin.id());
    let board = rt
        .block_on(boards.create_board(&ctx, CreateBoardRequest::new("HIST", "History", "")))
        .expect("board");
    let ticket = rt
        .block_on(tickets.create_ticket(
            &ctx,
            board.id(),
            CreateTicketRequest::new("Disk full").with_assignee(admin.id()),
        ))
        .expect("ticket");

    let updated = rt
        .block_on(tickets.update_ticket(
            &ctx,
            board.id(),
            ticket.id(),
            UpdateTicketRequest::new()
                .with_status(TicketStatus::InProgress)
                .unassign(),
        ))
        .expect("update");
    assert_eq!(updated.assignee_id(), None);

    let stored = rt
        .block_on(stores.tickets.find(board.id(), ticket.id()))
        .expect("find")
        .expect("ticket exists");
    assert_eq!(stored.status(), TicketStatus::InProgress);
    assert_eq!(stored.assignee_id(), None);

    let comment = rt
        .block_on(tickets.add_comment(&ctx, board.id(), ticket.id(), "Rotated logs"))
        .expect("comment");
    rt.block_on(tickets.update_comment(
        &ctx,
        board.id(),
        ticket.id(),
        comment.id(),
        "Rotated and compressed logs",
    ))
    .expect("edit");
    let comments = rt
        .block_on(tickets.list_comments(&ctx, board.id(), ticket.id(), PageRequest::default()))
        .expect("comments");
    let only = comments.items().first().expect("one comment");
    assert_eq!(only.text(), "Rotated and compressed logs");
    assert!(only.edited());

    let history = rt
        .block_on(tickets.list_history(&ctx, board.id(), ticket.id(), PageRequest::default()))
        .expect("history");
    let mut actions: Vec<_> = history.items().iter().map(|e| e.action().as_str()).collect();
    actions.sort_unstable();
    assert_eq!(
        actions,
        vec![
            HistoryAction::AssigneeChanged.as_str(),
            HistoryAction::CommentAdded.as_str(),
            HistoryAction::StatusChanged.as_str(),
        ]
    );

    rt.block_on(tickets.delete_comment(&ctx, board.id(), ticket.id(), comment.id()))
        .expect("delete");
    let missing = rt
        .block_on(stores.tickets.find_comment(ticket.id(), comment.id()))
        .expect("lookup");
    assert!(missing.is_none());
}
