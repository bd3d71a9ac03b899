//! Unit tests for boards and memberships.
