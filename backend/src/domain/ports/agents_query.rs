//! Driving port for reading agents.

use async_trait::async_trait;

use crate::domain::{Agent, AgentId, Caller, Error};

#[async_trait]
pub trait AgentsQuery: Send + Sync {
    async fn list_agents(&self, caller: &Caller) -> Result<Vec<Agent>, Error>;

    async fn agent_detail(&self, caller: &Caller, id: AgentId) -> Result<Agent, Error>;
}
