//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **security**: Argon2 password hashing.
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business rules.

pub mod persistence;
pub mod security;
