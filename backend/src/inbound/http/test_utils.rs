//! Test helpers for the HTTP handlers.
//!
//! [`TestCrm::app`] mounts every API route over an in-memory store, wrapped
//! in the same trace middleware as the server and a test session middleware.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::test::TestRequest;
use actix_web::{App, web};
use rstest::fixture;
use serde_json::json;

use crate::Trace;
use crate::inbound::http::api_routes;
use crate::test_support::http::{memory_http_state, test_session_middleware};
use crate::test_support::memory::InMemoryCrm;

/// In-memory store plus the app built over it.
pub struct TestCrm {
    pub store: Arc<InMemoryCrm>,
}

#[fixture]
pub fn crm() -> TestCrm {
    TestCrm {
        store: Arc::new(InMemoryCrm::new()),
    }
}

impl TestCrm {
    /// Build the app over a clone of the store; the result borrows nothing
    /// from `self`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(memory_http_state(self.store.clone())))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(api_routes),
            )
    }
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .unwrap_or_else(|| panic!("response sets no session cookie"))
}

/// Log in through the API and yield the session cookie.
macro_rules! log_in {
    ($app:expr, $username:expr, $password:expr) => {{
        let res = actix_web::test::call_service(
            $app,
            $crate::inbound::http::test_utils::login_request($username, $password).to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK, "login failed");
        $crate::inbound::http::test_utils::session_cookie(&res)
    }};
}
pub(crate) use log_in;

mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn app_outlives_the_fixture_it_was_built_from() {
        let store = Arc::new(InMemoryCrm::new());
        store.seed_organisor("olive", "plain-password");
        let app = {
            let crm = TestCrm {
                store: store.clone(),
            };
            crm.app()
        };
        let app = test::init_service(app).await;

        let cookie = log_in!(&app, "olive", "plain-password");
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/leads/")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
