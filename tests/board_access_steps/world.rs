//! Shared world state for board access BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use helpdesk::board::{
    adapters::memory::InMemoryBoardRepository, domain::Board, services::BoardService,
};
use helpdesk::context::RequestContext;
use helpdesk::error::{ErrorKind, ServiceError};
use helpdesk::identity::{
    adapters::{hashing::Argon2PasswordHasher, memory::InMemoryUserRepository},
    domain::User,
    services::UserService,
};
use helpdesk::ticket::{
    adapters::memory::InMemoryTicketRepository, domain::Ticket, services::TicketService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Account service used by the BDD world.
pub type TestAccounts = UserService<InMemoryUserRepository, Argon2PasswordHasher, DefaultClock>;

/// Board service used by the BDD world.
pub type TestBoards = BoardService<InMemoryUserRepository, InMemoryBoardRepository, DefaultClock>;

/// Ticket service used by the BDD world.
pub type TestTickets = TicketService<
    InMemoryUserRepository,
    InMemoryBoardRepository,
    InMemoryTicketRepository,
    DefaultClock,
>;

/// Scenario world for board access behaviour tests.
pub struct BoardWorld {
    /// Raw user storage for bootstrapping the first admin.
    pub users: Arc<InMemoryUserRepository>,
    /// Account service under test.
    pub accounts: TestAccounts,
    /// Board service under test.
    pub boards: TestBoards,
    /// Ticket service under test.
    pub tickets: TestTickets,
    /// Accounts created by the scenario, keyed by short name.
    pub people: HashMap<String, User>,
    /// Board the scenario works on.
    pub board: Option<Board>,
    /// Most recently created ticket.
    pub ticket: Option<Ticket>,
    /// Boards returned by successive deactivation calls.
    pub deactivations: Vec<Board>,
    /// Failure returned by the last attempted action.
    pub last_error: Option<ServiceError>,
}

impl BoardWorld {
    /// Creates a world over empty in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the fixed Argon2 parameters are rejected.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let boards = Arc::new(InMemoryBoardRepository::new());
        let clock = Arc::new(DefaultClock);
        let hasher =
            Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("valid argon2 params"));
        Self {
            accounts: UserService::new(Arc::clone(&users), hasher, Arc::clone(&clock)),
            boards: BoardService::new(Arc::clone(&users), Arc::clone(&boards), Arc::clone(&clock)),
            tickets: TicketService::new(
                Arc::clone(&users),
                boards,
                Arc::new(InMemoryTicketRepository::new()),
                clock,
            ),
            users,
            people: HashMap::new(),
            board: None,
            ticket: None,
            deactivations: Vec::new(),
            last_error: None,
        }
    }

    /// Looks up a named account.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario never created `name`.
    pub fn person(&self, name: &str) -> Result<&User, eyre::Report> {
        self.people
            .get(name)
            .ok_or_else(|| eyre::eyre!("no account named '{name}' in scenario world"))
    }

    /// Builds a request context acting as a named account.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario never created `name`.
    pub fn as_person(&self, name: &str) -> Result<RequestContext, eyre::Report> {
        Ok(RequestContext::new(self.person(name)?.id()))
    }

    /// Returns the scenario board.
    ///
    /// # Errors
    ///
    /// Returns an error if no board has been created.
    pub fn current_board(&self) -> Result<&Board, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no board in scenario world"))
    }

    /// Builds a request context acting as the board's creator.
    ///
    /// # Errors
    ///
    /// Returns an error if no board has been created.
    pub fn as_board_creator(&self) -> Result<RequestContext, eyre::Report> {
        Ok(RequestContext::new(self.current_board()?.created_by()))
    }

    /// Returns the kind of the last recorded failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the last action succeeded.
    pub fn last_error_kind(&self) -> Result<ErrorKind, eyre::Report> {
        self.last_error
            .as_ref()
            .map(ServiceError::kind)
            .ok_or_else(|| eyre::eyre!("expected the last action to fail"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
