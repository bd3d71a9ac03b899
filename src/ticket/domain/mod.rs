//! Domain model for tickets, their comments and their history.

mod comment;
mod error;
mod history;
mod ids;
mod number;
mod status;
mod ticket;

pub use comment::{PersistedCommentData, TicketComment};
pub use error::{
    ParseHistoryActionError, ParseTicketPriorityError, ParseTicketStatusError, TicketDomainError,
};
pub use history::{HistoryAction, PersistedHistoryData, TicketHistoryEntry};
pub use ids::{CommentId, HistoryEntryId, TicketId};
pub use number::TicketNumber;
pub use status::{TicketPriority, TicketStatus};
pub use ticket::{NewTicket, PersistedTicketData, Ticket};
