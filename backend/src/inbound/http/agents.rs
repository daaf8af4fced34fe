//! Agent handlers; every route is organisor only.
//!
//! ```text
//! GET  /api/v1/agents/
//! POST /api/v1/agents/create/        {"username":"alice","email":"alice@example.com"}
//! GET  /api/v1/agents/{id}/detail/
//! POST /api/v1/agents/{id}/update/
//! POST /api/v1/agents/{id}/delete/
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Agent, AgentId, ApiResult, FieldError, PersonalDetails, PersonalDetailsDraft,
};
use crate::inbound::http::accounts::UserResponse;
use crate::inbound::http::auth::current_caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const AGENT_LIST_PATH: &str = "/api/v1/agents/";

/// Agent form for create and update. New agents get a generated password.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl TryFrom<AgentRequest> for PersonalDetails {
    type Error = FieldError;

    fn try_from(value: AgentRequest) -> Result<Self, Self::Error> {
        Self::try_new(PersonalDetailsDraft {
            username: value.username,
            email: Some(value.email),
            first_name: value.first_name,
            last_name: value.last_name,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub id: i64,
    pub user: UserResponse,
}

impl From<&Agent> for AgentResponse {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id().get(),
            user: UserResponse::from(agent.user()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/agents/",
    responses(
        (status = 200, description = "Agents of the organisation", body = [AgentResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema)
    ),
    tags = ["agents"],
    operation_id = "listAgents"
)]
#[get("/agents/")]
pub async fn list_agents(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AgentResponse>>> {
    let caller = current_caller(&state, &session).await?;
    let agents = state.agents_query.list_agents(&caller).await?;
    Ok(web::Json(agents.iter().map(AgentResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/agents/create/",
    request_body = AgentRequest,
    responses(
        (status = 201, description = "Agent created", body = AgentResponse,
            headers(("Location" = String, description = "Agent list"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["agents"],
    operation_id = "createAgent"
)]
#[post("/agents/create/")]
pub async fn create_agent(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AgentRequest>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    let details = PersonalDetails::try_from(payload.into_inner())?;
    let agent = state.agents.create_agent(&caller, details).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, AGENT_LIST_PATH))
        .json(AgentResponse::from(&agent)))
}

#[utoipa::path(
    get,
    path = "/api/v1/agents/{id}/detail/",
    params(("id" = i64, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent", body = AgentResponse),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["agents"],
    operation_id = "agentDetail"
)]
#[get(r"/agents/{id:\d+}/detail/")]
pub async fn agent_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AgentResponse>> {
    let caller = current_caller(&state, &session).await?;
    let agent = state
        .agents_query
        .agent_detail(&caller, AgentId::new(path.into_inner()))
        .await?;
    Ok(web::Json(AgentResponse::from(&agent)))
}

#[utoipa::path(
    post,
    path = "/api/v1/agents/{id}/update/",
    params(("id" = i64, Path, description = "Agent id")),
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Updated agent", body = AgentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["agents"],
    operation_id = "updateAgent"
)]
#[post(r"/agents/{id:\d+}/update/")]
pub async fn update_agent(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AgentRequest>,
) -> ApiResult<web::Json<AgentResponse>> {
    let caller = current_caller(&state, &session).await?;
    let details = PersonalDetails::try_from(payload.into_inner())?;
    let agent = state
        .agents
        .update_agent(&caller, AgentId::new(path.into_inner()), details)
        .await?;
    Ok(web::Json(AgentResponse::from(&agent)))
}

/// Delete an agent; their leads stay, unassigned.
#[utoipa::path(
    post,
    path = "/api/v1/agents/{id}/delete/",
    params(("id" = i64, Path, description = "Agent id")),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["agents"],
    operation_id = "deleteAgent"
)]
#[post(r"/agents/{id:\d+}/delete/")]
pub async fn delete_agent(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    state
        .agents
        .delete_agent(&caller, AgentId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
