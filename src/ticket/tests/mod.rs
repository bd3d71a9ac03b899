//! Unit tests for tickets, comments and history.
