//! Boards, board memberships and the rules that tie them together.
//!
//! A board is created by an administrator, who becomes its first owner.
//! Every active super admin is then synchronized onto the board as an owner.
//! Owners manage memberships; the last owner can never be removed.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
