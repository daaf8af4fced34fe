//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters; driving ports (`*Command`, `*Query`) are implemented by
//! the domain services and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod accounts_command;
mod agent_repository;
mod agents_command;
mod agents_query;
mod caller_query;
mod categories_command;
mod categories_query;
mod category_repository;
mod lead_repository;
mod leads_command;
mod leads_query;
mod password_hasher;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError, StoredCredentials};
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use agent_repository::MockAgentRepository;
pub use agent_repository::{AgentRepository, AgentRepositoryError};
pub use agents_command::AgentsCommand;
pub use agents_query::AgentsQuery;
pub use caller_query::CallerQuery;
pub use categories_command::CategoriesCommand;
pub use categories_query::{CategoriesQuery, CategoryDetail, CategoryListing};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{CategoryRepository, CategoryRepositoryError};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{LeadRepository, LeadRepositoryError};
pub use leads_command::{LeadSubmission, LeadsCommand};
pub use leads_query::{LeadListing, LeadsQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
