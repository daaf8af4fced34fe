//! Lead handlers.
//!
//! ```text
//! GET  /api/v1/leads/
//! POST /api/v1/leads/create/
//! GET  /api/v1/leads/{id}/
//! POST /api/v1/leads/{id}/update/
//! POST /api/v1/leads/{id}/delete/
//! POST /api/v1/leads/{id}/assign-agent/ {"agentId":3}
//! POST /api/v1/leads/{id}/category      {"categoryId":null}
//! ```
//!
//! Every handler resolves the caller first; the lead service applies the
//! caller's record scope, so ids outside it answer `404`.

use actix_web::{HttpResponse, get, http::header, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{LeadListing, LeadSubmission};
use crate::domain::{
    AgentId, ApiResult, CategoryId, FieldError, Lead, LeadFields, LeadFieldsDraft, LeadId,
};
use crate::inbound::http::auth::current_caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const LEAD_LIST_PATH: &str = "/api/v1/leads/";

/// Lead form for create and update.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    #[serde(default)]
    pub description: String,
    pub phone_number: String,
    pub email: String,
    /// Agent of the caller's organisation, or absent to leave unassigned.
    #[serde(default)]
    pub agent_id: Option<i64>,
}

impl TryFrom<LeadRequest> for LeadSubmission {
    type Error = FieldError;

    fn try_from(value: LeadRequest) -> Result<Self, Self::Error> {
        let fields = LeadFields::try_new(LeadFieldsDraft {
            first_name: value.first_name,
            last_name: value.last_name,
            age: value.age,
            description: value.description,
            phone_number: value.phone_number,
            email: value.email,
        })?;
        Ok(Self {
            fields,
            agent_id: value.agent_id.map(AgentId::new),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAgentRequest {
    pub agent_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadCategoryRequest {
    /// `null` clears the category.
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub description: String,
    pub phone_number: String,
    pub email: String,
    pub date_added: DateTime<Utc>,
    pub agent_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl From<&Lead> for LeadResponse {
    fn from(lead: &Lead) -> Self {
        let fields = lead.fields();
        Self {
            id: lead.id().get(),
            first_name: fields.first_name().to_owned(),
            last_name: fields.last_name().to_owned(),
            age: fields.age(),
            description: fields.description().to_owned(),
            phone_number: fields.phone_number().to_owned(),
            email: fields.email().as_str().to_owned(),
            date_added: lead.date_added(),
            agent_id: lead.agent_id().map(AgentId::get),
            category_id: lead.category_id().map(CategoryId::get),
        }
    }
}

pub(crate) fn lead_responses(leads: &[Lead]) -> Vec<LeadResponse> {
    leads.iter().map(LeadResponse::from).collect()
}

/// Leads visible to the caller.
///
/// Organisors get assigned leads in `leads` and the rest in
/// `unassignedLeads`; agents only get `leads`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadListResponse {
    pub leads: Vec<LeadResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_leads: Option<Vec<LeadResponse>>,
}

impl From<LeadListing> for LeadListResponse {
    fn from(listing: LeadListing) -> Self {
        Self {
            leads: lead_responses(&listing.leads),
            unassigned_leads: listing.unassigned_leads.as_deref().map(lead_responses),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/",
    responses(
        (status = 200, description = "Visible leads", body = LeadListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "listLeads"
)]
#[get("/leads/")]
pub async fn list_leads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LeadListResponse>> {
    let caller = current_caller(&state, &session).await?;
    let listing = state.leads_query.list_leads(&caller).await?;
    Ok(web::Json(listing.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads/create/",
    request_body = LeadRequest,
    responses(
        (status = 201, description = "Lead created", body = LeadResponse,
            headers(("Location" = String, description = "Lead list"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "createLead"
)]
#[post("/leads/create/")]
pub async fn create_lead(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LeadRequest>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    let submission = LeadSubmission::try_from(payload.into_inner())?;
    let lead = state.leads.create_lead(&caller, submission).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, LEAD_LIST_PATH))
        .json(LeadResponse::from(&lead)))
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/{id}/",
    params(("id" = i64, Path, description = "Lead id")),
    responses(
        (status = 200, description = "Lead", body = LeadResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "leadDetail"
)]
#[get(r"/leads/{id:\d+}/")]
pub async fn lead_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LeadResponse>> {
    let caller = current_caller(&state, &session).await?;
    let lead = state
        .leads_query
        .lead_detail(&caller, LeadId::new(path.into_inner()))
        .await?;
    Ok(web::Json(LeadResponse::from(&lead)))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/update/",
    params(("id" = i64, Path, description = "Lead id")),
    request_body = LeadRequest,
    responses(
        (status = 200, description = "Updated lead", body = LeadResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "updateLead"
)]
#[post(r"/leads/{id:\d+}/update/")]
pub async fn update_lead(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<LeadRequest>,
) -> ApiResult<web::Json<LeadResponse>> {
    let caller = current_caller(&state, &session).await?;
    let submission = LeadSubmission::try_from(payload.into_inner())?;
    let lead = state
        .leads
        .update_lead(&caller, LeadId::new(path.into_inner()), submission)
        .await?;
    Ok(web::Json(LeadResponse::from(&lead)))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/delete/",
    params(("id" = i64, Path, description = "Lead id")),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "deleteLead"
)]
#[post(r"/leads/{id:\d+}/delete/")]
pub async fn delete_lead(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    state
        .leads
        .delete_lead(&caller, LeadId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Assign an agent of the caller's organisation to a lead.
///
/// Reassigning the current agent is a no-op that still answers `200`.
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/assign-agent/",
    params(("id" = i64, Path, description = "Lead id")),
    request_body = AssignAgentRequest,
    responses(
        (status = 200, description = "Lead with its new agent", body = LeadResponse),
        (status = 400, description = "Agent outside the organisation", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "assignAgent"
)]
#[post(r"/leads/{id:\d+}/assign-agent/")]
pub async fn assign_agent(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AssignAgentRequest>,
) -> ApiResult<web::Json<LeadResponse>> {
    let caller = current_caller(&state, &session).await?;
    let lead = state
        .leads
        .assign_agent(
            &caller,
            LeadId::new(path.into_inner()),
            AgentId::new(payload.agent_id),
        )
        .await?;
    Ok(web::Json(LeadResponse::from(&lead)))
}

/// Set or clear a lead's category. Agents may recategorise their own leads.
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/category",
    params(("id" = i64, Path, description = "Lead id")),
    request_body = LeadCategoryRequest,
    responses(
        (status = 200, description = "Recategorised lead", body = LeadResponse),
        (status = 400, description = "Category outside the organisation", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["leads"],
    operation_id = "updateLeadCategory"
)]
#[post(r"/leads/{id:\d+}/category")]
pub async fn update_lead_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<LeadCategoryRequest>,
) -> ApiResult<web::Json<LeadResponse>> {
    let caller = current_caller(&state, &session).await?;
    let lead = state
        .leads
        .update_lead_category(
            &caller,
            LeadId::new(path.into_inner()),
            payload.category_id.map(CategoryId::new),
        )
        .await?;
    Ok(web::Json(LeadResponse::from(&lead)))
}

#[cfg(test)]
#[path = "leads_tests.rs"]
mod tests;
