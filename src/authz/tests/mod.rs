//! Unit tests for the pure rule functions.
