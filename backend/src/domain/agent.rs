//! Agents: salespeople working leads for one organisation.

use super::{AgentId, OrganisationId, User};

/// An agent record together with its user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    organisation_id: OrganisationId,
    user: User,
}

impl Agent {
    pub fn new(id: AgentId, organisation_id: OrganisationId, user: User) -> Self {
        Self {
            id,
            organisation_id,
            user,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn organisation_id(&self) -> OrganisationId {
        self.organisation_id
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
