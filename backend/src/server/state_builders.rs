//! Builders wiring repositories and services into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use crm::domain::ports::{
    AccountRepository, AgentRepository, CategoryRepository, LeadRepository, PasswordHasher,
};
use crm::domain::{AccountService, AgentService, CategoryService, LeadService};
use crm::inbound::http::state::{HttpState, HttpStatePorts};
use crm::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselAgentRepository, DieselCategoryRepository,
    DieselLeadRepository,
};
use crm::outbound::security::Argon2PasswordHasher;

/// One repository per aggregate; services share them through `Arc`.
struct Repositories<Acc, Ag, L, C> {
    accounts: Arc<Acc>,
    agents: Arc<Ag>,
    leads: Arc<L>,
    categories: Arc<C>,
}

fn wire_services<Acc, Ag, L, C>(
    repos: Repositories<Acc, Ag, L, C>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    Acc: AccountRepository + 'static,
    Ag: AgentRepository + 'static,
    L: LeadRepository + 'static,
    C: CategoryRepository + 'static,
{
    let Repositories {
        accounts,
        agents,
        leads,
        categories,
    } = repos;

    let account_service = Arc::new(AccountService::new(
        accounts,
        agents.clone(),
        hasher.clone(),
    ));
    let lead_service = Arc::new(LeadService::new(
        leads.clone(),
        agents.clone(),
        categories.clone(),
        clock,
    ));
    let category_service = Arc::new(CategoryService::new(categories, leads));
    let agent_service = Arc::new(AgentService::new(agents, hasher));

    HttpState::new(HttpStatePorts {
        accounts: account_service.clone(),
        callers: account_service,
        leads: lead_service.clone(),
        leads_query: lead_service,
        categories: category_service.clone(),
        categories_query: category_service,
        agents: agent_service.clone(),
        agents_query: agent_service,
    })
}

/// Build the shared HTTP state over Diesel repositories, Argon2 hashing and
/// the system clock.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let repos = Repositories {
        accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
        agents: Arc::new(DieselAgentRepository::new(pool.clone())),
        leads: Arc::new(DieselLeadRepository::new(pool.clone())),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
    };
    web::Data::new(wire_services(
        repos,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(DefaultClock),
    ))
}
