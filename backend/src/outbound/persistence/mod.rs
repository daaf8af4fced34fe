//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain's driven ports over `diesel-async` with
//! `bb8` pooling. Row structs (`models.rs`) and the table DSL (`schema.rs`)
//! stay private to this module; rows are re-validated into domain types on
//! the way out.
//!
//! # Example
//!
//! ```ignore
//! use crm::outbound::persistence::{DbPool, DieselLeadRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/crm")).await?;
//! let leads = DieselLeadRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_agent_repository;
mod diesel_basic_error_mapping;
mod diesel_category_repository;
mod diesel_lead_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_agent_repository::DieselAgentRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_lead_repository::DieselLeadRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
