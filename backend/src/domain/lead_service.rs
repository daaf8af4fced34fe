//! Lead use-cases: scoped listing and lookups, organisor-only edits,
//! agent assignment and recategorisation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AgentRepository, CategoryRepository, LeadListing, LeadRepository, LeadSubmission,
    LeadsCommand, LeadsQuery,
};
use crate::domain::{
    AgentFilter, AgentId, Caller, CategoryId, Error, FieldError, Lead, LeadFilter, LeadId,
    NewLead, OrganisationId, RecordScope,
};

/// Implements [`LeadsQuery`] and [`LeadsCommand`].
#[derive(Clone)]
pub struct LeadService<L, A, C> {
    leads: Arc<L>,
    agents: Arc<A>,
    categories: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<L, A, C> LeadService<L, A, C> {
    pub fn new(leads: Arc<L>, agents: Arc<A>, categories: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            leads,
            agents,
            categories,
            clock,
        }
    }
}

pub(crate) fn lead_not_found(id: LeadId) -> Error {
    Error::not_found(format!("lead {id} not found"))
}

impl<L, A, C> LeadService<L, A, C>
where
    L: LeadRepository,
    A: AgentRepository,
    C: CategoryRepository,
{
    /// Reject agents outside the organisation the same way as unknown ids.
    async fn require_agent(
        &self,
        organisation_id: OrganisationId,
        agent_id: AgentId,
    ) -> Result<(), Error> {
        match self.agents.find(organisation_id, agent_id).await? {
            Some(_) => Ok(()),
            None => Err(FieldError::new(
                "agentId",
                "unknown_agent",
                format!("agent {agent_id} is not part of this organisation"),
            )
            .into()),
        }
    }

    async fn require_category(
        &self,
        organisation_id: OrganisationId,
        category_id: CategoryId,
    ) -> Result<(), Error> {
        match self.categories.find(organisation_id, category_id).await? {
            Some(_) => Ok(()),
            None => Err(FieldError::new(
                "categoryId",
                "unknown_category",
                format!("category {category_id} is not part of this organisation"),
            )
            .into()),
        }
    }
}

#[async_trait]
impl<L, A, C> LeadsQuery for LeadService<L, A, C>
where
    L: LeadRepository,
    A: AgentRepository,
    C: CategoryRepository,
{
    async fn list_leads(&self, caller: &Caller) -> Result<LeadListing, Error> {
        let visible = LeadFilter::visible(RecordScope::for_caller(caller));
        if !caller.is_organisor() {
            return Ok(LeadListing {
                leads: self.leads.list(&visible).await?,
                unassigned_leads: None,
            });
        }
        let leads = self
            .leads
            .list(&visible.with_agent(AgentFilter::Assigned))
            .await?;
        let unassigned = self
            .leads
            .list(&visible.with_agent(AgentFilter::Unassigned))
            .await?;
        Ok(LeadListing {
            leads,
            unassigned_leads: Some(unassigned),
        })
    }

    async fn lead_detail(&self, caller: &Caller, id: LeadId) -> Result<Lead, Error> {
        self.leads
            .find(&RecordScope::for_caller(caller), id)
            .await?
            .ok_or_else(|| lead_not_found(id))
    }
}

#[async_trait]
impl<L, A, C> LeadsCommand for LeadService<L, A, C>
where
    L: LeadRepository,
    A: AgentRepository,
    C: CategoryRepository,
{
    async fn create_lead(
        &self,
        caller: &Caller,
        submission: LeadSubmission,
    ) -> Result<Lead, Error> {
        let organisation_id = caller.require_organisor()?;
        if let Some(agent_id) = submission.agent_id {
            self.require_agent(organisation_id, agent_id).await?;
        }
        let lead = self
            .leads
            .insert(&NewLead {
                organisation_id,
                agent_id: submission.agent_id,
                fields: submission.fields,
                date_added: self.clock.utc(),
            })
            .await?;
        info!(lead_id = %lead.id(), %organisation_id, "lead created");
        Ok(lead)
    }

    async fn update_lead(
        &self,
        caller: &Caller,
        id: LeadId,
        submission: LeadSubmission,
    ) -> Result<Lead, Error> {
        let organisation_id = caller.require_organisor()?;
        let scope = RecordScope::organisation(organisation_id);
        if let Some(agent_id) = submission.agent_id {
            self.require_agent(organisation_id, agent_id).await?;
        }
        self.leads
            .update(&scope, id, &submission.fields, submission.agent_id)
            .await?
            .ok_or_else(|| lead_not_found(id))
    }

    async fn delete_lead(&self, caller: &Caller, id: LeadId) -> Result<(), Error> {
        let organisation_id = caller.require_organisor()?;
        if self
            .leads
            .delete(&RecordScope::organisation(organisation_id), id)
            .await?
        {
            info!(lead_id = %id, %organisation_id, "lead deleted");
            Ok(())
        } else {
            Err(lead_not_found(id))
        }
    }

    async fn assign_agent(
        &self,
        caller: &Caller,
        id: LeadId,
        agent_id: AgentId,
    ) -> Result<Lead, Error> {
        let organisation_id = caller.require_organisor()?;
        let scope = RecordScope::organisation(organisation_id);
        let lead = self
            .leads
            .find(&scope, id)
            .await?
            .ok_or_else(|| lead_not_found(id))?;
        if lead.agent_id() == Some(agent_id) {
            return Ok(lead);
        }
        self.require_agent(organisation_id, agent_id).await?;
        let updated = self
            .leads
            .assign_agent(&scope, id, agent_id)
            .await?
            .ok_or_else(|| lead_not_found(id))?;
        info!(lead_id = %id, %agent_id, "agent assigned to lead");
        Ok(updated)
    }

    async fn update_lead_category(
        &self,
        caller: &Caller,
        id: LeadId,
        category_id: Option<CategoryId>,
    ) -> Result<Lead, Error> {
        let scope = RecordScope::for_caller(caller);
        if let Some(category_id) = category_id {
            self.require_category(scope.organisation_id(), category_id)
                .await?;
        }
        self.leads
            .set_category(&scope, id, category_id)
            .await?
            .ok_or_else(|| lead_not_found(id))
    }
}

#[cfg(test)]
#[path = "lead_service_tests.rs"]
mod tests;
