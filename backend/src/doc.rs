//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP adapter together
//! with the error schemas and the session cookie security scheme. Swagger UI
//! serves it in debug builds; `cargo run --bin openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the session cookie security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "CRM API",
        description = "Organisations manage agents, leads and lead categories."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::sign_up,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::leads::list_leads,
        crate::inbound::http::leads::create_lead,
        crate::inbound::http::leads::lead_detail,
        crate::inbound::http::leads::update_lead,
        crate::inbound::http::leads::delete_lead,
        crate::inbound::http::leads::assign_agent,
        crate::inbound::http::leads::update_lead_category,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::category_detail,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::agents::list_agents,
        crate::inbound::http::agents::create_agent,
        crate::inbound::http::agents::agent_detail,
        crate::inbound::http::agents::update_agent,
        crate::inbound::http::agents::delete_agent,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "accounts", description = "Sign-up and session management"),
        (name = "leads", description = "Leads visible to the caller"),
        (name = "categories", description = "Lead categories of the organisation"),
        (name = "agents", description = "Agents of the organisation"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[rstest]
    #[case("/api/v1/signup")]
    #[case("/api/v1/leads/")]
    #[case("/api/v1/leads/{id}/assign-agent/")]
    #[case("/api/v1/leads/categories/{id}")]
    #[case("/api/v1/agents/{id}/detail/")]
    #[case("/health/ready")]
    fn document_lists_the_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn error_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("crate.domain.Error").expect("Error schema") {
            RefOr::T(Schema::Object(obj)) => {
                for field in ["code", "message", "traceId"] {
                    assert!(obj.properties.contains_key(field), "missing {field}");
                }
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn document_registers_the_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
        assert!(components.schemas.contains_key("crate.domain.Error"));
    }
}
