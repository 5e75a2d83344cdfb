//! Domain logic for the campus gate-pass service.
//!
//! Everything in this crate is pure: no I/O, no async. Time and identifier
//! generation are injected so the lifecycle rules can be exercised
//! deterministically from tests.

pub mod access;
pub mod clock;
pub mod error;
pub mod ids;
pub mod pass;
pub mod query;
pub mod roles;
pub mod types;
