//! Port for agent persistence.
use async_trait::async_trait;

use crate::domain::{Agent, AgentId, Error, NewUser, OrganisationId, PersonalDetails, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by agent repository adapters.
    pub enum AgentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "agent repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "agent repository query failed: {message}",
        /// The username is already registered.
        UsernameTaken { username: String } => "username {username} is already taken",
    }
}

impl From<AgentRepositoryError> for Error {
    fn from(value: AgentRepositoryError) -> Self {
        match value {
            AgentRepositoryError::Connection { message } => Self::service_unavailable(message),
            AgentRepositoryError::Query { message } => Self::internal(message),
            AgentRepositoryError::UsernameTaken { username } => {
                Self::conflict(format!("username {username} is already taken"))
            }
        }
    }
}

/// Agent lookups are always restricted to one organisation, except
/// [`AgentRepository::find_by_user`] which resolves a session's own record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Agents of an organisation ordered by id.
    async fn list(&self, organisation_id: OrganisationId)
    -> Result<Vec<Agent>, AgentRepositoryError>;

    /// One agent of an organisation.
    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<Option<Agent>, AgentRepositoryError>;

    /// The agent record linked to a user account.
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Agent>, AgentRepositoryError>;

    /// Insert the agent's user and agent row in one transaction.
    async fn create(
        &self,
        organisation_id: OrganisationId,
        user: &NewUser,
    ) -> Result<Agent, AgentRepositoryError>;

    /// Replace the personal details of an agent's user; `None` when out of scope.
    async fn update(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
        details: &PersonalDetails,
    ) -> Result<Option<Agent>, AgentRepositoryError>;

    /// Delete an agent record; its leads keep existing unassigned.
    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<bool, AgentRepositoryError>;
}
