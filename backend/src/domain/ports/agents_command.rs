//! Driving port for managing agents.

use async_trait::async_trait;

use crate::domain::{Agent, AgentId, Caller, Error, PersonalDetails};

#[async_trait]
pub trait AgentsCommand: Send + Sync {
    /// Create an agent account with a generated password.
    async fn create_agent(&self, caller: &Caller, details: PersonalDetails)
    -> Result<Agent, Error>;

    async fn update_agent(
        &self,
        caller: &Caller,
        id: AgentId,
        details: PersonalDetails,
    ) -> Result<Agent, Error>;

    async fn delete_agent(&self, caller: &Caller, id: AgentId) -> Result<(), Error>;
}
