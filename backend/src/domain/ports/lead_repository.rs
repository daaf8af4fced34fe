//! Port for lead persistence.
//!
//! Every read and write takes a [`RecordScope`] or [`LeadFilter`]; adapters
//! must apply it in the query itself so out-of-scope rows behave as missing.
use async_trait::async_trait;

use crate::domain::{
    AgentId, CategoryId, Error, Lead, LeadFields, LeadFilter, LeadId, NewLead, RecordScope,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by lead repository adapters.
    pub enum LeadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "lead repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "lead repository query failed: {message}",
    }
}

impl From<LeadRepositoryError> for Error {
    fn from(value: LeadRepositoryError) -> Self {
        match value {
            LeadRepositoryError::Connection { message } => Self::service_unavailable(message),
            LeadRepositoryError::Query { message } => Self::internal(message),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Leads admitted by `filter`, ordered by id.
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Number of leads admitted by `filter`.
    async fn count(&self, filter: &LeadFilter) -> Result<u64, LeadRepositoryError>;

    async fn find(
        &self,
        scope: &RecordScope,
        id: LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    async fn insert(&self, lead: &NewLead) -> Result<Lead, LeadRepositoryError>;

    /// Replace the editable fields and agent of a visible lead.
    async fn update(
        &self,
        scope: &RecordScope,
        id: LeadId,
        fields: &LeadFields,
        agent_id: Option<AgentId>,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Set the agent of a visible lead.
    async fn assign_agent(
        &self,
        scope: &RecordScope,
        id: LeadId,
        agent_id: AgentId,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Set or clear the category of a visible lead.
    async fn set_category(
        &self,
        scope: &RecordScope,
        id: LeadId,
        category_id: Option<CategoryId>,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Delete a visible lead, returning whether a row was removed.
    async fn delete(&self, scope: &RecordScope, id: LeadId) -> Result<bool, LeadRepositoryError>;
}
