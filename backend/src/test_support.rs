//! Test utilities for the CRM crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Nothing here is wired into the server binary.

pub mod clock;
pub mod fixtures;
pub mod hasher;
pub mod http;
pub mod memory;
