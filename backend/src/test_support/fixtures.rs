//! Builders for domain values used across test suites.

use crate::domain::{
    Agent, AgentId, Caller, Category, CategoryId, CategoryName, Lead, LeadFields,
    LeadFieldsDraft, LeadId, NewLead, OrganisationId, PersonalDetails, PersonalDetailsDraft, User,
    UserId,
};

use super::clock::fixture_instant;

/// Valid personal details with an address derived from `username`.
pub fn details(username: &str) -> PersonalDetails {
    PersonalDetails::try_new(PersonalDetailsDraft {
        username: username.to_owned(),
        email: Some(format!("{username}@example.com")),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
    })
    .unwrap_or_else(|err| panic!("fixture details for {username}: {err}"))
}

pub fn organisor_user(user_id: i64) -> User {
    User::new(
        UserId::new(user_id),
        details(&format!("organisor{user_id}")),
        true,
        false,
    )
}

pub fn agent_user(user_id: i64) -> User {
    User::new(
        UserId::new(user_id),
        details(&format!("agent{user_id}")),
        false,
        true,
    )
}

pub fn organisor_caller(user_id: i64, organisation_id: i64) -> Caller {
    Caller::Organisor {
        user: organisor_user(user_id),
        organisation_id: OrganisationId::new(organisation_id),
    }
}

pub fn agent_caller(user_id: i64, agent_id: i64, organisation_id: i64) -> Caller {
    Caller::Agent {
        user: agent_user(user_id),
        agent_id: AgentId::new(agent_id),
        organisation_id: OrganisationId::new(organisation_id),
    }
}

pub fn agent(agent_id: i64, organisation_id: i64, user_id: i64) -> Agent {
    Agent::new(
        AgentId::new(agent_id),
        OrganisationId::new(organisation_id),
        agent_user(user_id),
    )
}

pub fn category(id: i64, organisation_id: i64, name: &str) -> Category {
    Category::new(
        CategoryId::new(id),
        OrganisationId::new(organisation_id),
        CategoryName::new(name).unwrap_or_else(|err| panic!("fixture category {name}: {err}")),
    )
}

pub fn lead_fields(first_name: &str) -> LeadFields {
    LeadFields::try_new(LeadFieldsDraft {
        first_name: first_name.to_owned(),
        last_name: "Prospect".to_owned(),
        age: 35,
        description: "Interested in the premium plan".to_owned(),
        phone_number: "01632 960123".to_owned(),
        email: format!("{}@example.com", first_name.to_lowercase()),
    })
    .unwrap_or_else(|err| panic!("fixture lead {first_name}: {err}"))
}

pub fn lead(id: i64, organisation_id: i64, agent_id: Option<i64>, category_id: Option<i64>) -> Lead {
    Lead::new(
        LeadId::new(id),
        NewLead {
            organisation_id: OrganisationId::new(organisation_id),
            agent_id: agent_id.map(AgentId::new),
            fields: lead_fields(&format!("Lead{id}")),
            date_added: fixture_instant(),
        },
    )
    .with_category(category_id.map(CategoryId::new))
}
