//! In-memory implementation of every repository port.
//!
//! Filtering goes through the domain's [`RecordScope`] and [`LeadFilter`]
//! predicates, so handler and BDD suites exercise the same visibility rules
//! the Diesel adapters express in SQL.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AgentRepository, AgentRepositoryError,
    CategoryRepository, CategoryRepositoryError, LeadRepository, LeadRepositoryError,
    StoredCredentials,
};
use crate::domain::{
    Agent, AgentId, Category, CategoryId, CategoryName, Lead, LeadFields, LeadFilter, LeadId,
    NewLead, NewUser, OrganisationId, PasswordHash, PersonalDetails, RecordScope, User, UserId,
    Username,
};

use super::clock::fixture_instant;
use super::fixtures::{details, lead_fields};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<UserId, StoredUser>,
    organisations: BTreeMap<OrganisationId, UserId>,
    agents: BTreeMap<AgentId, (OrganisationId, UserId)>,
    categories: BTreeMap<CategoryId, Category>,
    leads: BTreeMap<LeadId, Lead>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username_taken(&self, username: &Username) -> bool {
        self.users
            .values()
            .any(|stored| stored.user.username() == username)
    }

    fn insert_user(&mut self, new_user: &NewUser) -> Option<User> {
        if self.username_taken(new_user.details().username()) {
            return None;
        }
        let id = UserId::new(self.next_id());
        let user = new_user.clone().into_user(id);
        self.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash().clone(),
            },
        );
        Some(user)
    }

    fn agent(&self, id: AgentId) -> Option<Agent> {
        let (organisation_id, user_id) = self.agents.get(&id)?;
        let stored = self.users.get(user_id)?;
        Some(Agent::new(id, *organisation_id, stored.user.clone()))
    }

    fn visible_lead_mut(&mut self, scope: &RecordScope, id: LeadId) -> Option<&mut Lead> {
        self.leads
            .get_mut(&id)
            .filter(|lead| scope.admits_lead(lead))
    }
}

/// Shared in-memory store implementing the account, agent, lead and category
/// repositories.
#[derive(Debug, Default)]
pub struct InMemoryCrm {
    tables: Mutex<Tables>,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Insert an organisor whose password is stored in the
    /// [`super::hasher::PlaintextPasswordHasher`] format.
    pub fn seed_organisor(&self, username: &str, password: &str) -> (UserId, OrganisationId) {
        let mut tables = self.lock();
        let new_user = NewUser::organisor(details(username), plain_hash(password));
        let user = tables
            .insert_user(&new_user)
            .unwrap_or_else(|| panic!("duplicate fixture username {username}"));
        let organisation_id = OrganisationId::new(tables.next_id());
        tables.organisations.insert(organisation_id, user.id());
        (user.id(), organisation_id)
    }

    /// Insert an agent of `organisation_id` with a known password.
    pub fn seed_agent(
        &self,
        organisation_id: OrganisationId,
        username: &str,
        password: &str,
    ) -> (UserId, AgentId) {
        let mut tables = self.lock();
        let new_user = NewUser::agent(details(username), plain_hash(password));
        let user = tables
            .insert_user(&new_user)
            .unwrap_or_else(|| panic!("duplicate fixture username {username}"));
        let agent_id = AgentId::new(tables.next_id());
        tables.agents.insert(agent_id, (organisation_id, user.id()));
        (user.id(), agent_id)
    }

    pub fn seed_category(&self, organisation_id: OrganisationId, name: &str) -> CategoryId {
        let mut tables = self.lock();
        let id = CategoryId::new(tables.next_id());
        let name =
            CategoryName::new(name).unwrap_or_else(|err| panic!("fixture category {name}: {err}"));
        tables
            .categories
            .insert(id, Category::new(id, organisation_id, name));
        id
    }

    pub fn seed_lead(
        &self,
        organisation_id: OrganisationId,
        first_name: &str,
        agent_id: Option<AgentId>,
        category_id: Option<CategoryId>,
    ) -> LeadId {
        let mut tables = self.lock();
        let id = LeadId::new(tables.next_id());
        let lead = Lead::new(
            id,
            NewLead {
                organisation_id,
                agent_id,
                fields: lead_fields(first_name),
                date_added: fixture_instant(),
            },
        )
        .with_category(category_id);
        tables.leads.insert(id, lead);
        id
    }

    /// Overwrite a user's password with one in the plaintext hasher format.
    pub fn set_password(&self, username: &str, password: &str) -> UserId {
        let mut tables = self.lock();
        let stored = tables
            .users
            .values_mut()
            .find(|stored| stored.user.username().as_str() == username)
            .unwrap_or_else(|| panic!("no fixture user {username}"));
        stored.password_hash = plain_hash(password);
        stored.user.id()
    }

    /// Look up a lead without any scoping.
    pub fn lead(&self, id: LeadId) -> Option<Lead> {
        self.lock().leads.get(&id).cloned()
    }

    /// Look up a user and their stored hash without any scoping.
    pub fn user(&self, id: UserId) -> Option<(User, PasswordHash)> {
        self.lock()
            .users
            .get(&id)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone()))
    }

    pub fn agent_exists(&self, id: AgentId) -> bool {
        self.lock().agents.contains_key(&id)
    }
}

fn plain_hash(password: &str) -> PasswordHash {
    PasswordHash::new(format!("plain${password}"))
}

#[async_trait]
impl AccountRepository for InMemoryCrm {
    async fn create_organisor(
        &self,
        user: &NewUser,
    ) -> Result<(User, OrganisationId), AccountRepositoryError> {
        let mut tables = self.lock();
        let created = tables.insert_user(user).ok_or_else(|| {
            AccountRepositoryError::username_taken(user.details().username().as_str())
        })?;
        let organisation_id = OrganisationId::new(tables.next_id());
        tables.organisations.insert(organisation_id, created.id());
        Ok((created, organisation_id))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|stored| stored.user.username() == username)
            .map(|stored| StoredCredentials {
                user_id: stored.user.id(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError> {
        Ok(self.lock().users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_organisation(
        &self,
        owner: UserId,
    ) -> Result<Option<OrganisationId>, AccountRepositoryError> {
        Ok(self
            .lock()
            .organisations
            .iter()
            .find(|(_, user_id)| **user_id == owner)
            .map(|(id, _)| *id))
    }
}

#[async_trait]
impl AgentRepository for InMemoryCrm {
    async fn list(
        &self,
        organisation_id: OrganisationId,
    ) -> Result<Vec<Agent>, AgentRepositoryError> {
        let tables = self.lock();
        let scope = RecordScope::organisation(organisation_id);
        Ok(tables
            .agents
            .keys()
            .filter_map(|id| tables.agent(*id))
            .filter(|agent| scope.admits_agent(agent))
            .collect())
    }

    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<Option<Agent>, AgentRepositoryError> {
        let scope = RecordScope::organisation(organisation_id);
        Ok(self
            .lock()
            .agent(id)
            .filter(|agent| scope.admits_agent(agent)))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Agent>, AgentRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .agents
            .iter()
            .find(|(_, (_, owner))| *owner == user_id)
            .and_then(|(id, _)| tables.agent(*id)))
    }

    async fn create(
        &self,
        organisation_id: OrganisationId,
        user: &NewUser,
    ) -> Result<Agent, AgentRepositoryError> {
        let mut tables = self.lock();
        let created = tables.insert_user(user).ok_or_else(|| {
            AgentRepositoryError::username_taken(user.details().username().as_str())
        })?;
        let id = AgentId::new(tables.next_id());
        tables.agents.insert(id, (organisation_id, created.id()));
        Ok(Agent::new(id, organisation_id, created))
    }

    async fn update(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
        details: &PersonalDetails,
    ) -> Result<Option<Agent>, AgentRepositoryError> {
        let mut tables = self.lock();
        let Some((owner, user_id)) = tables.agents.get(&id).copied() else {
            return Ok(None);
        };
        if owner != organisation_id {
            return Ok(None);
        }
        let clash = tables.users.values().any(|stored| {
            stored.user.id() != user_id && stored.user.username() == details.username()
        });
        if clash {
            return Err(AgentRepositoryError::username_taken(
                details.username().as_str(),
            ));
        }
        if let Some(stored) = tables.users.get_mut(&user_id) {
            stored.user = stored.user.clone().with_details(details.clone());
        }
        Ok(tables.agent(id))
    }

    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: AgentId,
    ) -> Result<bool, AgentRepositoryError> {
        let mut tables = self.lock();
        match tables.agents.get(&id) {
            Some((owner, _)) if *owner == organisation_id => {}
            _ => return Ok(false),
        }
        tables.agents.remove(&id);
        for lead in tables.leads.values_mut() {
            if lead.agent_id() == Some(id) {
                *lead = lead.clone().with_agent(None);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl LeadRepository for InMemoryCrm {
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(self
            .lock()
            .leads
            .values()
            .filter(|lead| filter.admits(lead))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &LeadFilter) -> Result<u64, LeadRepositoryError> {
        let count = self
            .lock()
            .leads
            .values()
            .filter(|lead| filter.admits(lead))
            .count();
        u64::try_from(count).map_err(|err| LeadRepositoryError::query(err.to_string()))
    }

    async fn find(
        &self,
        scope: &RecordScope,
        id: LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        Ok(self
            .lock()
            .leads
            .get(&id)
            .filter(|lead| scope.admits_lead(lead))
            .cloned())
    }

    async fn insert(&self, lead: &NewLead) -> Result<Lead, LeadRepositoryError> {
        let mut tables = self.lock();
        let id = LeadId::new(tables.next_id());
        let created = Lead::new(id, lead.clone());
        tables.leads.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        scope: &RecordScope,
        id: LeadId,
        fields: &LeadFields,
        agent_id: Option<AgentId>,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut tables = self.lock();
        Ok(tables.visible_lead_mut(scope, id).map(|lead| {
            *lead = lead.clone().with_fields(fields.clone()).with_agent(agent_id);
            lead.clone()
        }))
    }

    async fn assign_agent(
        &self,
        scope: &RecordScope,
        id: LeadId,
        agent_id: AgentId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut tables = self.lock();
        Ok(tables.visible_lead_mut(scope, id).map(|lead| {
            *lead = lead.clone().with_agent(Some(agent_id));
            lead.clone()
        }))
    }

    async fn set_category(
        &self,
        scope: &RecordScope,
        id: LeadId,
        category_id: Option<CategoryId>,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut tables = self.lock();
        Ok(tables.visible_lead_mut(scope, id).map(|lead| {
            *lead = lead.clone().with_category(category_id);
            lead.clone()
        }))
    }

    async fn delete(&self, scope: &RecordScope, id: LeadId) -> Result<bool, LeadRepositoryError> {
        let mut tables = self.lock();
        if tables.visible_lead_mut(scope, id).is_none() {
            return Ok(false);
        }
        Ok(tables.leads.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCrm {
    async fn list(
        &self,
        organisation_id: OrganisationId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        let scope = RecordScope::organisation(organisation_id);
        Ok(self
            .lock()
            .categories
            .values()
            .filter(|category| scope.admits_category(category))
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let scope = RecordScope::organisation(organisation_id);
        Ok(self
            .lock()
            .categories
            .get(&id)
            .filter(|category| scope.admits_category(category))
            .cloned())
    }

    async fn insert(
        &self,
        organisation_id: OrganisationId,
        name: &CategoryName,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut tables = self.lock();
        let id = CategoryId::new(tables.next_id());
        let category = Category::new(id, organisation_id, name.clone());
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn rename(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut tables = self.lock();
        let Some(existing) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        if existing.organisation_id() != organisation_id {
            return Ok(None);
        }
        *existing = Category::new(id, organisation_id, name.clone());
        Ok(Some(existing.clone()))
    }

    async fn delete(
        &self,
        organisation_id: OrganisationId,
        id: CategoryId,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut tables = self.lock();
        match tables.categories.get(&id) {
            Some(category) if category.organisation_id() == organisation_id => {}
            _ => return Ok(false),
        }
        tables.categories.remove(&id);
        for lead in tables.leads.values_mut() {
            if lead.category_id() == Some(id) {
                *lead = lead.clone().with_category(None);
            }
        }
        Ok(true)
    }
}
