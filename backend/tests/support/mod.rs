//! Shared helpers for the Diesel integration suites.
//!
//! Each suite under `backend/tests/` compiles as its own crate and pulls these
//! in with `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{TestDatabase, test_database};
