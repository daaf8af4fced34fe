//! Agent management for organisors.
//!
//! New agents get a random password that is hashed immediately and never
//! returned; they are expected to reset it before first login.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;

use crate::domain::ports::{AgentRepository, AgentsCommand, AgentsQuery, PasswordHasher};
use crate::domain::{Agent, AgentId, Caller, Error, NewPassword, NewUser, PersonalDetails};

/// Length of generated agent passwords.
pub const GENERATED_PASSWORD_LEN: usize = 24;

/// Random alphanumeric password for a new agent account.
pub(crate) fn generate_agent_password() -> NewPassword {
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect();
    NewPassword::generated(password)
}

/// Implements [`AgentsQuery`] and [`AgentsCommand`].
#[derive(Clone)]
pub struct AgentService<A> {
    agents: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<A> AgentService<A> {
    pub fn new(agents: Arc<A>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { agents, hasher }
    }
}

fn agent_not_found(id: AgentId) -> Error {
    Error::not_found(format!("agent {id} not found"))
}

#[async_trait]
impl<A> AgentsQuery for AgentService<A>
where
    A: AgentRepository,
{
    async fn list_agents(&self, caller: &Caller) -> Result<Vec<Agent>, Error> {
        let organisation_id = caller.require_organisor()?;
        Ok(self.agents.list(organisation_id).await?)
    }

    async fn agent_detail(&self, caller: &Caller, id: AgentId) -> Result<Agent, Error> {
        let organisation_id = caller.require_organisor()?;
        self.agents
            .find(organisation_id, id)
            .await?
            .ok_or_else(|| agent_not_found(id))
    }
}

#[async_trait]
impl<A> AgentsCommand for AgentService<A>
where
    A: AgentRepository,
{
    async fn create_agent(
        &self,
        caller: &Caller,
        details: PersonalDetails,
    ) -> Result<Agent, Error> {
        let organisation_id = caller.require_organisor()?;
        let details = details.require_email()?;
        let password = generate_agent_password();
        let hash = self.hasher.hash(password.expose()).await?;
        let agent = self
            .agents
            .create(organisation_id, &NewUser::agent(details, hash))
            .await?;
        info!(agent_id = %agent.id(), %organisation_id, "agent created");
        Ok(agent)
    }

    async fn update_agent(
        &self,
        caller: &Caller,
        id: AgentId,
        details: PersonalDetails,
    ) -> Result<Agent, Error> {
        let organisation_id = caller.require_organisor()?;
        let details = details.require_email()?;
        self.agents
            .update(organisation_id, id, &details)
            .await?
            .ok_or_else(|| agent_not_found(id))
    }

    async fn delete_agent(&self, caller: &Caller, id: AgentId) -> Result<(), Error> {
        let organisation_id = caller.require_organisor()?;
        if self.agents.delete(organisation_id, id).await? {
            info!(agent_id = %id, %organisation_id, "agent deleted");
            Ok(())
        } else {
            Err(agent_not_found(id))
        }
    }
}
