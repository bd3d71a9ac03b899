//! Shared wiring for in-memory orchestration tests.

use std::sync::Arc;

use helpdesk::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{Board, MembershipRole},
    services::{BoardService, CreateBoardRequest, CreateMembershipRequest},
};
use helpdesk::context::RequestContext;
use helpdesk::identity::{
    adapters::{hashing::Argon2PasswordHasher, memory::InMemoryUserRepository},
    domain::{AssignableRole, EmailAddress, NewUser, User, UserRole},
    ports::UserRepository,
    services::{CreateUserRequest, UserService},
};
use helpdesk::ticket::{adapters::memory::InMemoryTicketRepository, services::TicketService};
use mockable::DefaultClock;
use rstest::fixture;

/// Account service wired to in-memory storage.
pub type Accounts = UserService<InMemoryUserRepository, Argon2PasswordHasher, DefaultClock>;

/// Board service wired to in-memory storage.
pub type Boards = BoardService<InMemoryUserRepository, InMemoryBoardRepository, DefaultClock>;

/// Ticket service wired to in-memory storage.
pub type Tickets = TicketService<
    InMemoryUserRepository,
    InMemoryBoardRepository,
    InMemoryTicketRepository,
    DefaultClock,
>;

/// Every orchestrator sharing one set of repositories.
pub struct Desk {
    /// Raw user storage, used to bootstrap the first account.
    pub users: Arc<InMemoryUserRepository>,
    /// Account orchestration.
    pub accounts: Accounts,
    /// Board and membership orchestration.
    pub boards: Boards,
    /// Ticket and comment orchestration.
    pub tickets: Tickets,
}

impl Desk {
    /// Stores a super admin directly. Nothing in the service layer can
    /// create one, so deployments bootstrap it the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be built or stored.
    pub async fn bootstrap_super_admin(&self, email: &str) -> Result<User, eyre::Report> {
        let user = User::new(
            NewUser {
                email: EmailAddress::new(email)?,
                password_hash: "$argon2id$bootstrap".to_owned(),
                full_name: "Root".to_owned(),
                role: UserRole::SuperAdmin,
            },
            &DefaultClock,
        )?;
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Creates an account through the account service.
    ///
    /// # Errors
    ///
    /// Returns an error if the requester may not create the role.
    pub async fn hire(
        &self,
        requester: &User,
        email: &str,
        role: AssignableRole,
    ) -> Result<User, eyre::Report> {
        let request = CreateUserRequest::new(email, "correct horse", email, role);
        Ok(self.accounts.create_user(&as_user(requester), request).await?)
    }

    /// Creates a board through the board service.
    ///
    /// # Errors
    ///
    /// Returns an error if the requester may not create boards.
    pub async fn open_board(&self, requester: &User, code: &str) -> Result<Board, eyre::Report> {
        let request = CreateBoardRequest::new(code, format!("{code} support"), "");
        Ok(self.boards.create_board(&as_user(requester), request).await?)
    }

    /// Grants `user` a membership on `board` on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the membership cannot be created.
    pub async fn grant(
        &self,
        owner: &User,
        board: &Board,
        user: &User,
        role: MembershipRole,
    ) -> Result<(), eyre::Report> {
        self.boards
            .create_membership(
                &as_user(owner),
                board.id(),
                CreateMembershipRequest::new(user.id(), role),
            )
            .await?;
        Ok(())
    }
}

/// Builds a request context acting as `user`.
#[must_use]
pub fn as_user(user: &User) -> RequestContext {
    RequestContext::new(user.id())
}

/// Provides a fresh set of services over empty storage.
///
/// Hashing uses minimal Argon2 costs to keep the suite fast.
#[fixture]
pub fn desk() -> Desk {
    let users = Arc::new(InMemoryUserRepository::new());
    let boards = Arc::new(InMemoryBoardRepository::new());
    let tickets = Arc::new(InMemoryTicketRepository::new());
    let clock = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("valid argon2 params"));

    Desk {
        accounts: UserService::new(Arc::clone(&users), hasher, Arc::clone(&clock)),
        boards: BoardService::new(Arc::clone(&users), Arc::clone(&boards), Arc::clone(&clock)),
        tickets: TicketService::new(Arc::clone(&users), boards, tickets, clock),
        users,
    }
}
