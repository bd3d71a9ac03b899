//! Account persistence against `PostgreSQL`.

use crate::postgres::helpers::{
    CleanupGuard, Stores, ensure_template, seed_user, setup_pool, test_runtime,
};
use helpdesk::identity::{
    domain::{EmailAddress, NewUser, User, UserRole, UserStatus},
    ports::{UserFilter, UserRepository, UserRepositoryError},
};
use helpdesk::paging::PageRequest;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn stored_user_round_trips_through_email_lookup(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_user_lookup_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let rt = test_runtime();

    let user = seed_user(&rt, &stores.users, "Ops@Example.com", UserRole::Agent).expect("seed");
    let email = EmailAddress::new("ops@example.com").expect("email");
    let found = rt
        .block_on(stores.users.find_by_email(&email))
        .expect("lookup")
        .expect("user exists");

    assert_eq!(found.id(), user.id());
    assert_eq!(found.role(), UserRole::Agent);
    assert_eq!(found.status(), UserStatus::Active);
}

#[rstest]
fn duplicate_email_is_reported(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_user_dup_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let rt = test_runtime();

    seed_user(&rt, &stores.users, "dup@example.com", UserRole::Customer).expect("first");
    let twin = User::new(
        NewUser {
            email: EmailAddress::new("dup@example.com").expect("email"),
            password_hash: "$argon2id$twin".to_owned(),
            full_name: "Twin".to_owned(),
            role: UserRole::Customer,
        },
        &DefaultClock,
    )
    .expect("user");

    let result = rt.block_on(stores.users.store(&twin));
    assert!(
        matches!(result, Err(UserRepositoryError::DuplicateEmail(_))),
        "expected duplicate email, got {result:?}"
    );
}

#[rstest]
fn listing_filters_and_pages(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = format!("test_user_list_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let stores = Stores::new(&setup_pool(shared_test_cluster, &db_name).expect("pool"));
    let rt = test_runtime();

    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        seed_user(&rt, &stores.users, email, UserRole::Agent).expect("seed agent");
    }
    let mut retired =
        seed_user(&rt, &stores.users, "d@example.com", UserRole::Agent).expect("seed agent");
    retired.deactivate(&DefaultClock);
    rt.block_on(stores.users.update(&retired)).expect("update");
    seed_user(&rt, &stores.users, "root@example.com", UserRole::SuperAdmin).expect("seed root");

    let page = rt
        .block_on(stores.users.list(
            UserFilter::default()
                .with_role(UserRole::Agent)
                .with_status(UserStatus::Active),
            PageRequest::new(2, 2),
        ))
        .expect("list");
    assert_eq!(page.total(), 3);
    let emails: Vec<_> = page.items().iter().map(|u| u.email().as_str()).collect();
    assert_eq!(emails, vec!["c@example.com"]);

    let admins = rt
        .block_on(stores.users.list_active_by_role(UserRole::SuperAdmin))
        .expect("super admins");
    assert_eq!(admins.len(), 1);
}
