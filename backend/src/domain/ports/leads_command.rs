//! Driving port for changing leads.

use async_trait::async_trait;

use crate::domain::{AgentId, Caller, CategoryId, Error, Lead, LeadFields, LeadId};

/// Validated lead form: the editable fields plus an optional agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub fields: LeadFields,
    pub agent_id: Option<AgentId>,
}

#[async_trait]
pub trait LeadsCommand: Send + Sync {
    async fn create_lead(&self, caller: &Caller, submission: LeadSubmission)
    -> Result<Lead, Error>;

    async fn update_lead(
        &self,
        caller: &Caller,
        id: LeadId,
        submission: LeadSubmission,
    ) -> Result<Lead, Error>;

    async fn delete_lead(&self, caller: &Caller, id: LeadId) -> Result<(), Error>;

    async fn assign_agent(
        &self,
        caller: &Caller,
        id: LeadId,
        agent_id: AgentId,
    ) -> Result<Lead, Error>;

    /// Set or clear (`None`) the category of a lead.
    async fn update_lead_category(
        &self,
        caller: &Caller,
        id: LeadId,
        category_id: Option<CategoryId>,
    ) -> Result<Lead, Error>;
}
