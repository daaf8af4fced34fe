//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AgentsCommand, AgentsQuery, CallerQuery, CategoriesCommand, CategoriesQuery,
    LeadsCommand, LeadsQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsCommand>,
    pub callers: Arc<dyn CallerQuery>,
    pub leads: Arc<dyn LeadsCommand>,
    pub leads_query: Arc<dyn LeadsQuery>,
    pub categories: Arc<dyn CategoriesCommand>,
    pub categories_query: Arc<dyn CategoriesQuery>,
    pub agents: Arc<dyn AgentsCommand>,
    pub agents_query: Arc<dyn AgentsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub callers: Arc<dyn CallerQuery>,
    pub leads: Arc<dyn LeadsCommand>,
    pub leads_query: Arc<dyn LeadsQuery>,
    pub categories: Arc<dyn CategoriesCommand>,
    pub categories_query: Arc<dyn CategoriesQuery>,
    pub agents: Arc<dyn AgentsCommand>,
    pub agents_query: Arc<dyn AgentsQuery>,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            callers,
            leads,
            leads_query,
            categories,
            categories_query,
            agents,
            agents_query,
        } = ports;
        Self {
            accounts,
            callers,
            leads,
            leads_query,
            categories,
            categories_query,
            agents,
            agents_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
