//! Pure authorization and business rules.
//!
//! Every rule is a small function over role enums (and, where needed, a
//! count or flag loaded by the caller) returning `Result<(), RuleViolation>`.
//! Rules never perform I/O; orchestrators load state, call the rules in
//! order and stop at the first violation.
//!
//! - [`role_matrix`]: which global role may manage which account
//! - [`membership_rules`]: board and membership gates
//! - [`ticket_rules`]: ticket create/edit and reporter/assignee eligibility
//! - [`comment_rules`]: comment edit/delete gates

pub mod comment_rules;
pub mod membership_rules;
pub mod role_matrix;
pub mod ticket_rules;
mod violation;

pub use violation::{RuleResult, RuleViolation};

#[cfg(test)]
mod tests;
