//! Domain model for user accounts.

mod email;
mod error;
mod ids;
mod role;
mod status;
mod user;

pub use email::EmailAddress;
pub use error::{ParseUserRoleError, ParseUserStatusError, UserDomainError};
pub use ids::UserId;
pub use role::{AssignableRole, UserRole};
pub use status::UserStatus;
pub use user::{NewUser, PersistedUserData, User};
