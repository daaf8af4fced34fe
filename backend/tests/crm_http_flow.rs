//! End-to-end flow through the JSON API over the in-memory store.
//!
//! An organisor signs up, builds their organisation through the API, and an
//! agent then works the lead assigned to them.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use crm::Trace;
use crm::domain::TRACE_ID_HEADER;
use crm::inbound::http::api_routes;
use crm::test_support::http::{memory_http_state, test_session_middleware};
use crm::test_support::memory::InMemoryCrm;
use rstest::rstest;
use serde_json::{Value, json};

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(memory_http_state($store.clone())))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(test_session_middleware())
                        .configure(api_routes),
                ),
        )
        .await
    };
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

fn post(uri: &str, cookie: &Cookie<'static>, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

fn get(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

fn lead_body(first_name: &str, agent_id: Option<i64>) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Prospect",
        "age": 41,
        "description": "Met at the trade fair",
        "phoneNumber": "+44 20 7946 0000",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "agentId": agent_id,
    })
}

#[rstest]
#[actix_web::test]
async fn organisor_builds_an_organisation_and_an_agent_works_a_lead() {
    let store = Arc::new(InMemoryCrm::new());
    let app = app!(store);

    let signup = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({
                "username": "olive",
                "email": "olive@example.com",
                "firstName": "Olive",
                "lastName": "Owner",
                "password": "tidy-lemon-42",
                "passwordConfirmation": "tidy-lemon-42",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CREATED);

    let login = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "olive", "password": "tidy-lemon-42"}))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let olive = session_cookie(&login);

    let agent = test::call_service(
        &app,
        post(
            "/api/v1/agents/create/",
            &olive,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "firstName": "Alice",
                "lastName": "Agent",
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(agent.status(), StatusCode::CREATED);
    let agent: Value = test::read_body_json(agent).await;
    let agent_id = agent["id"].as_i64().expect("agent id");

    let category = test::call_service(
        &app,
        post(
            "/api/v1/leads/create-category/",
            &olive,
            json!({"name": "Hot"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(category.status(), StatusCode::CREATED);
    let category: Value = test::read_body_json(category).await;
    let category_id = category["id"].as_i64().expect("category id");

    let assigned = test::call_service(
        &app,
        post(
            "/api/v1/leads/create/",
            &olive,
            lead_body("Ann", Some(agent_id)),
        )
        .to_request(),
    )
    .await;
    assert_eq!(assigned.status(), StatusCode::CREATED);
    assert_eq!(
        assigned.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(&b"/api/v1/leads/"[..])
    );
    let assigned: Value = test::read_body_json(assigned).await;
    let lead_id = assigned["id"].as_i64().expect("lead id");

    let unassigned = test::call_service(
        &app,
        post(
            "/api/v1/leads/create/",
            &olive,
            lead_body("Una", None),
        )
        .to_request(),
    )
    .await;
    assert_eq!(unassigned.status(), StatusCode::CREATED);

    let listing = test::call_service(&app, get("/api/v1/leads/", &olive).to_request()).await;
    let listing: Value = test::read_body_json(listing).await;
    assert_eq!(listing["leads"].as_array().map(Vec::len), Some(1));
    assert_eq!(listing["unassignedLeads"][0]["firstName"], "Una");

    // The generated agent password is never disclosed; give alice a known one.
    store.set_password("alice", "agent-password-1");
    let login = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "alice", "password": "agent-password-1"}))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let alice = session_cookie(&login);

    let listing = test::call_service(&app, get("/api/v1/leads/", &alice).to_request()).await;
    let listing: Value = test::read_body_json(listing).await;
    assert_eq!(listing["leads"][0]["firstName"], "Ann");
    assert!(listing.get("unassignedLeads").is_none());

    let recategorised = test::call_service(
        &app,
        post(
            &format!("/api/v1/leads/{lead_id}/category"),
            &alice,
            json!({"categoryId": category_id}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(recategorised.status(), StatusCode::OK);

    let categories = test::call_service(
        &app,
        get("/api/v1/leads/categories/", &olive).to_request(),
    )
    .await;
    let categories: Value = test::read_body_json(categories).await;
    assert_eq!(categories["leadCount"], 1);
    assert_eq!(categories["unassignedLeadCount"], 1);
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_are_rejected_with_a_trace_id() {
    let store = Arc::new(InMemoryCrm::new());
    let app = app!(store);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/agents/").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], trace_id);
}
