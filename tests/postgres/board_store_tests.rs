//! Board and membership persistence against `PostgreSQL`.

use crate::postgres::helpers::{
    CleanupGuard, Stores, ensure_template, seed_user, setup_pool, test_runtime,
};
use helpdesk::board::{
    domain::{BoardCode, MembershipRole},
    ports::BoardRepository,
    services::{CreateBoardRequest, CreateMembershipRequest},
};
use helpdesk::context::RequestContext;
use helpdesk::error::ErrorKind;
use helpdesk::identity::domain::UserRole;
use helpdesk::paging::PageRequest;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn board_creation_persists_owners_atomically(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_board_create_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let service = stores.board_service();
    let rt = test_runtime();

    let root = seed_user(&rt, &stores.users, "root@example.com", UserRole::SuperAdmin)
        .expect("seed root");
    let admin = seed_user(&rt, &stores.users, "admin@example.com", UserRole::Admin)
        .expect("seed admin");
    let board = rt
        .block_on(service.create_board(
            &RequestContext::new(admin.id()),
            CreateBoardRequest::new("ops1", "Operations", "Night shift"),
        ))
        .expect("board created");

    let code = BoardCode::new("OPS1").expect("code");
    assert!(rt.block_on(stores.boards.code_exists(&code)).expect("exists"));
    assert_eq!(
        rt.block_on(stores.boards.count_owners(board.id()))
            .expect("count"),
        2
    );
    let root_membership = rt
        .block_on(stores.boards.find_membership(board.id(), root.id()))
        .expect("lookup")
        .expect("super admin is a member");
    assert_eq!(root_membership.role(), MembershipRole::Owner);

    let duplicate = rt
        .block_on(service.create_board(
            &RequestContext::new(admin.id()),
            CreateBoardRequest::new("OPS1", "Again", ""),
        ))
        .expect_err("code taken");
    assert_eq!(duplicate.kind(), ErrorKind::Conflict);
}

#[rstest]
fn memberships_page_and_lists_follow_storage(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_board_members_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let service = stores.board_service();
    let rt = test_runtime();

    let admin = seed_user(&rt, &stores.users, "admin@example.com", UserRole::Admin)
        .expect("seed admin");
    let agent = seed_user(&rt, &stores.users, "agent@example.com", UserRole::Agent)
        .expect("seed agent");
    let owner_ctx = RequestContext::new(admin.id());
    let first = rt
        .block_on(service.create_board(&owner_ctx, CreateBoardRequest::new("AAAA", "A", "")))
        .expect("first board");
    rt.block_on(service.create_board(&owner_ctx, CreateBoardRequest::new("BBBB", "B", "")))
        .expect("second board");

    rt.block_on(service.create_membership(
        &owner_ctx,
        first.id(),
        CreateMembershipRequest::new(agent.id(), MembershipRole::Agent),
    ))
    .expect("membership");
    let again = rt
        .block_on(service.create_membership(
            &owner_ctx,
            first.id(),
            CreateMembershipRequest::new(agent.id(), MembershipRole::Viewer),
        ))
        .expect_err("already a member");
    assert_eq!(again.kind(), ErrorKind::Conflict);

    let boards = rt
        .block_on(service.list_boards(&RequestContext::new(agent.id()), PageRequest::default()))
        .expect("boards");
    assert_eq!(boards.total(), 1);

    let members = rt
        .block_on(service.list_memberships(&owner_ctx, first.id(), PageRequest::new(1, 1)))
        .expect("members");
    assert_eq!(members.total(), 2);
    assert_eq!(members.items().len(), 1);

    rt.block_on(service.remove_membership(&owner_ctx, first.id(), agent.id()))
        .expect("removed");
    assert!(
        rt.block_on(stores.boards.find_membership(first.id(), agent.id()))
            .expect("lookup")
            .is_none()
    );
}
