//! Fixtures shared by unit tests.

use crate::context::RequestContext;
use crate::identity::adapters::memory::InMemoryUserRepository;
use crate::identity::domain::{EmailAddress, NewUser, User, UserRole};
use crate::identity::ports::UserRepository;
use mockable::DefaultClock;

/// Stores an active account directly, bypassing authorization.
pub(crate) async fn seed_user(users: &InMemoryUserRepository, email: &str, role: UserRole) -> User {
    let user = User::new(
        NewUser {
            email: EmailAddress::new(email).expect("valid seed email"),
            password_hash: "$argon2id$seed".to_owned(),
            full_name: format!("Seed {role}"),
            role,
        },
        &DefaultClock,
    )
    .expect("valid seed user");
    users.store(&user).await.expect("seed user stored");
    user
}

/// Builds a request context acting as `user`.
pub(crate) fn ctx(user: &User) -> RequestContext {
    RequestContext::new(user.id())
}

/// Marks an account inactive directly in storage.
pub(crate) async fn deactivate_user(users: &InMemoryUserRepository, user: &User) {
    let mut stored = user.clone();
    stored.deactivate(&DefaultClock);
    users.update(&stored).await.expect("user updated");
}
