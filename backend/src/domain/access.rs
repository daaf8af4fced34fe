//! Role resolution and record scoping.
//!
//! Every list, detail, update and delete operation derives its visible rows
//! from one [`RecordScope`] built by [`RecordScope::for_caller`]. Services ask
//! the scope whether a record is admitted; repositories translate the same
//! scope into SQL predicates.

use super::{Agent, AgentId, Category, CategoryId, Error, Lead, OrganisationId, User};

/// The authenticated user of one request, resolved with their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Owner of an organisation; sees everything inside it.
    Organisor {
        user: User,
        organisation_id: OrganisationId,
    },
    /// Agent of an organisation; sees only leads assigned to them.
    Agent {
        user: User,
        agent_id: AgentId,
        organisation_id: OrganisationId,
    },
}

impl Caller {
    pub fn user(&self) -> &User {
        match self {
            Self::Organisor { user, .. } | Self::Agent { user, .. } => user,
        }
    }

    pub fn organisation_id(&self) -> OrganisationId {
        match self {
            Self::Organisor {
                organisation_id, ..
            }
            | Self::Agent {
                organisation_id, ..
            } => *organisation_id,
        }
    }

    pub fn is_organisor(&self) -> bool {
        matches!(self, Self::Organisor { .. })
    }

    /// Guard for organisor-only operations, yielding the caller's organisation.
    ///
    /// # Examples
    /// ```
    /// use crm::domain::{
    ///     AgentId, Caller, ErrorCode, OrganisationId, PersonalDetails, PersonalDetailsDraft,
    ///     User, UserId,
    /// };
    ///
    /// let details = PersonalDetails::try_new(PersonalDetailsDraft {
    ///     username: "agent".into(),
    ///     ..PersonalDetailsDraft::default()
    /// })
    /// .unwrap();
    /// let caller = Caller::Agent {
    ///     user: User::new(UserId::new(2), details, false, true),
    ///     agent_id: AgentId::new(1),
    ///     organisation_id: OrganisationId::new(1),
    /// };
    /// let err = caller.require_organisor().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn require_organisor(&self) -> Result<OrganisationId, Error> {
        match self {
            Self::Organisor {
                organisation_id, ..
            } => Ok(*organisation_id),
            Self::Agent { .. } => Err(Error::forbidden("organisor role required")),
        }
    }
}

/// Guard for operations reserved to anonymous visitors, such as sign-up.
pub fn require_anonymous<T>(session_user: Option<T>) -> Result<(), Error> {
    match session_user {
        Some(_) => Err(Error::forbidden("already signed in")),
        None => Ok(()),
    }
}

/// The organisation, and for agents the agent, a query is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordScope {
    organisation_id: OrganisationId,
    agent_id: Option<AgentId>,
}

impl RecordScope {
    /// Scope of everything the caller may see.
    pub fn for_caller(caller: &Caller) -> Self {
        match caller {
            Caller::Organisor {
                organisation_id, ..
            } => Self::organisation(*organisation_id),
            Caller::Agent {
                organisation_id,
                agent_id,
                ..
            } => Self {
                organisation_id: *organisation_id,
                agent_id: Some(*agent_id),
            },
        }
    }

    /// Whole-organisation scope.
    pub fn organisation(organisation_id: OrganisationId) -> Self {
        Self {
            organisation_id,
            agent_id: None,
        }
    }

    pub fn organisation_id(&self) -> OrganisationId {
        self.organisation_id
    }

    /// Agent restriction applied to leads, if any.
    pub fn agent_id(&self) -> Option<AgentId> {
        self.agent_id
    }

    pub fn admits_lead(&self, lead: &Lead) -> bool {
        lead.organisation_id() == self.organisation_id
            && self
                .agent_id
                .is_none_or(|agent| lead.agent_id() == Some(agent))
    }

    /// Categories carry no agent, so only the organisation applies.
    pub fn admits_category(&self, category: &Category) -> bool {
        category.organisation_id() == self.organisation_id
    }

    pub fn admits_agent(&self, agent: &Agent) -> bool {
        agent.organisation_id() == self.organisation_id
    }
}

/// Restriction on whether a lead has an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentFilter {
    #[default]
    Any,
    Assigned,
    Unassigned,
}

/// Restriction on a lead's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    Any,
    Categorised,
    Uncategorised,
    Only(CategoryId),
}

/// A scope narrowed by assignment and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadFilter {
    pub scope: RecordScope,
    pub agent: AgentFilter,
    pub category: CategoryFilter,
}

impl LeadFilter {
    /// Every lead visible in `scope`.
    pub fn visible(scope: RecordScope) -> Self {
        Self {
            scope,
            agent: AgentFilter::Any,
            category: CategoryFilter::Any,
        }
    }

    #[must_use]
    pub fn with_agent(mut self, agent: AgentFilter) -> Self {
        self.agent = agent;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn admits(&self, lead: &Lead) -> bool {
        let agent_ok = match self.agent {
            AgentFilter::Any => true,
            AgentFilter::Assigned => lead.agent_id().is_some(),
            AgentFilter::Unassigned => lead.agent_id().is_none(),
        };
        let category_ok = match self.category {
            CategoryFilter::Any => true,
            CategoryFilter::Categorised => lead.category_id().is_some(),
            CategoryFilter::Uncategorised => lead.category_id().is_none(),
            CategoryFilter::Only(id) => lead.category_id() == Some(id),
        };
        self.scope.admits_lead(lead) && agent_ok && category_ok
    }
}

#[cfg(test)]
mod tests;
