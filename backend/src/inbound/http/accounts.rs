//! Account handlers: sign-up, login and logout.
//!
//! ```text
//! POST /api/v1/signup {"username":"owner","password":"...","passwordConfirmation":"..."}
//! POST /api/v1/login  {"username":"owner","password":"..."}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ApiResult, LoginCredentials, PersonalDetailsDraft, SignUp, SignUpDraft, User,
    require_anonymous,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up request body for `POST /api/v1/signup`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
}

impl From<SignUpRequest> for SignUpDraft {
    fn from(value: SignUpRequest) -> Self {
        Self {
            details: PersonalDetailsDraft {
                username: value.username,
                email: value.email,
                first_name: value.first_name,
                last_name: value.last_name,
            },
            password: value.password,
            password_confirmation: value.password_confirmation,
        }
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_organisor: bool,
    pub is_agent: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let details = user.details();
        Self {
            id: user.id().get(),
            username: details.username().as_str().to_owned(),
            email: details.email().map(|email| email.as_str().to_owned()),
            first_name: details.first_name().to_owned(),
            last_name: details.last_name().to_owned(),
            is_organisor: user.is_organisor(),
            is_agent: user.is_agent(),
        }
    }
}

/// Register an organisor and their organisation.
///
/// Refused for callers who are already signed in.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Organisor created", body = UserResponse,
            headers(("Location" = String, description = "Login endpoint"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Already signed in", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    require_anonymous(session.user_id()?)?;
    let request = SignUp::try_new(payload.into_inner().into())?;
    let user = state.accounts.sign_up(request).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, "/api/v1/login"))
        .json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)?;
    let user_id = state.accounts.login(&credentials).await?;
    session.persist_user(user_id)?;
    info!(%user_id, "user logged in");
    Ok(HttpResponse::Ok().finish())
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
