//! quotd library
//!
//! Quote-of-the-day protocol: a single-slot daily cache, a quotes API client
//! with per-role fallbacks, and a scheduler that refreshes at midnight.
//! Exposed as a library for the binary and for integration tests.

pub mod cli;
pub mod clock;
pub mod config;
pub mod quote;
pub mod scheduler;
pub mod storage;
