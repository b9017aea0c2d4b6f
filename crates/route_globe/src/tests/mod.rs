//! Crate-level integration tests
//!
//! End-to-end passes over realistic airport data through the public API.
