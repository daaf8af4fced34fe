//! Internal Diesel row structs and their conversion into domain types.
//!
//! Rows never leave the persistence module. Conversions re-validate stored
//! values through the domain constructors and report failures as strings the
//! repositories wrap in their `Query` error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Agent, AgentId, Category, CategoryId, CategoryName, Lead, LeadFields, LeadFieldsDraft, LeadId,
    NewLead, OrganisationId, PersonalDetails, PersonalDetailsDraft, User, UserId,
};

use super::schema::{agents, categories, leads, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_organisor: bool,
    pub is_agent: bool,
    #[expect(dead_code, reason = "selected for parity with the table; not surfaced yet")]
    pub date_joined: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let id = UserId::new(self.id);
        let details = PersonalDetails::try_new(PersonalDetailsDraft {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        })
        .map_err(|err| format!("stored user {id} is invalid: {err}"))?;
        Ok(User::new(id, details, self.is_organisor, self.is_agent))
    }
}

/// Insertable user; `date_joined` takes the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub is_organisor: bool,
    pub is_agent: bool,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(user: &'a crate::domain::NewUser) -> Self {
        let details = user.details();
        Self {
            username: details.username().as_str(),
            email: details.email().map(|email| email.as_str()),
            first_name: details.first_name(),
            last_name: details.last_name(),
            password_hash: user.password_hash().as_str(),
            is_organisor: user.is_organisor(),
            is_agent: user.is_agent(),
        }
    }
}

/// Personal-details changeset; `email` is always written so it can be cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserDetailsUpdate<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> UserDetailsUpdate<'a> {
    pub(crate) fn from_domain(details: &'a PersonalDetails) -> Self {
        Self {
            username: details.username().as_str(),
            email: details.email().map(|email| email.as_str()),
            first_name: details.first_name(),
            last_name: details.last_name(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AgentRow {
    pub id: i64,
    #[expect(dead_code, reason = "the joined user row carries the identifier")]
    pub user_id: i64,
    pub organisation_id: i64,
}

pub(crate) fn agent_from_rows(agent: AgentRow, user: UserRow) -> Result<Agent, String> {
    Ok(Agent::new(
        AgentId::new(agent.id),
        OrganisationId::new(agent.organisation_id),
        user.into_user()?,
    ))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub organisation_id: i64,
}

impl CategoryRow {
    pub(crate) fn into_category(self) -> Result<Category, String> {
        let id = CategoryId::new(self.id);
        let name = CategoryName::new(&self.name)
            .map_err(|err| format!("stored category {id} is invalid: {err}"))?;
        Ok(Category::new(
            id,
            OrganisationId::new(self.organisation_id),
            name,
        ))
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub description: String,
    pub phone_number: String,
    pub email: String,
    pub date_added: DateTime<Utc>,
    pub organisation_id: i64,
    pub agent_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl LeadRow {
    pub(crate) fn into_lead(self) -> Result<Lead, String> {
        let id = LeadId::new(self.id);
        let fields = LeadFields::try_new(LeadFieldsDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            description: self.description,
            phone_number: self.phone_number,
            email: self.email,
        })
        .map_err(|err| format!("stored lead {id} is invalid: {err}"))?;
        Ok(Lead::new(
            id,
            NewLead {
                organisation_id: OrganisationId::new(self.organisation_id),
                agent_id: self.agent_id.map(AgentId::new),
                fields,
                date_added: self.date_added,
            },
        )
        .with_category(self.category_id.map(CategoryId::new)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub(crate) struct NewLeadRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: i32,
    pub description: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub date_added: DateTime<Utc>,
    pub organisation_id: i64,
    pub agent_id: Option<i64>,
}

impl<'a> NewLeadRow<'a> {
    pub(crate) fn from_domain(lead: &'a NewLead) -> Self {
        let fields = &lead.fields;
        Self {
            first_name: fields.first_name(),
            last_name: fields.last_name(),
            age: fields.age(),
            description: fields.description(),
            phone_number: fields.phone_number(),
            email: fields.email().as_str(),
            date_added: lead.date_added,
            organisation_id: lead.organisation_id.get(),
            agent_id: lead.agent_id.map(AgentId::get),
        }
    }
}

/// Full lead edit; a `None` agent unassigns the lead.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = leads)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LeadUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: i32,
    pub description: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub agent_id: Option<i64>,
}

impl<'a> LeadUpdate<'a> {
    pub(crate) fn from_domain(fields: &'a LeadFields, agent_id: Option<AgentId>) -> Self {
        Self {
            first_name: fields.first_name(),
            last_name: fields.last_name(),
            age: fields.age(),
            description: fields.description(),
            phone_number: fields.phone_number(),
            email: fields.email().as_str(),
            agent_id: agent_id.map(AgentId::get),
        }
    }
}
