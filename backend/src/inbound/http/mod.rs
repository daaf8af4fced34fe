//! HTTP inbound adapter exposing the JSON API.

pub mod accounts;
pub mod agents;
pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod leads;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

/// Register every `/api/v1` handler on a scope.
///
/// The caller supplies the session middleware and the [`state::HttpState`]
/// app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use crm::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::sign_up)
        .service(accounts::login)
        .service(accounts::logout)
        .service(leads::list_leads)
        .service(leads::create_lead)
        .service(leads::lead_detail)
        .service(leads::update_lead)
        .service(leads::delete_lead)
        .service(leads::assign_agent)
        .service(leads::update_lead_category)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::category_detail)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(agents::list_agents)
        .service(agents::create_agent)
        .service(agents::agent_detail)
        .service(agents::update_agent)
        .service(agents::delete_agent);
}
