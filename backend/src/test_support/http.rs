//! HTTP state and session middleware for handler tests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::{AccountService, AgentService, CategoryService, LeadService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

use super::clock::FixedClock;
use super::hasher::PlaintextPasswordHasher;
use super::memory::InMemoryCrm;

/// Session middleware with a fresh key and the `Secure` flag off, so the
/// test client sends the cookie back over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Wire every service over one in-memory store, the plaintext hasher and a
/// clock fixed at [`super::clock::fixture_instant`].
pub fn memory_http_state(store: Arc<InMemoryCrm>) -> HttpState {
    let hasher = Arc::new(PlaintextPasswordHasher);
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        hasher.clone(),
    ));
    let leads = Arc::new(LeadService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(FixedClock::fixture()),
    ));
    let categories = Arc::new(CategoryService::new(store.clone(), store.clone()));
    let agents = Arc::new(AgentService::new(store, hasher));

    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        callers: accounts,
        leads: leads.clone(),
        leads_query: leads,
        categories: categories.clone(),
        categories_query: categories,
        agents: agents.clone(),
        agents_query: agents,
    })
}
