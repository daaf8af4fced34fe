//! Category handlers.
//!
//! ```text
//! GET  /api/v1/leads/categories/
//! POST /api/v1/leads/create-category/     {"name":"Contacted"}
//! GET  /api/v1/leads/categories/{id}
//! POST /api/v1/leads/categories/{id}/update
//! POST /api/v1/leads/categories/{id}/delete
//! ```
//!
//! Categories belong to an organisation; agents may read them, and lead
//! counts and lists only include leads the caller can see.

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CategoryDetail, CategoryListing};
use crate::domain::{ApiResult, Category, CategoryId, CategoryName};
use crate::inbound::http::auth::current_caller;
use crate::inbound::http::leads::{LeadResponse, lead_responses};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const CATEGORY_LIST_PATH: &str = "/api/v1/leads/categories/";

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().get(),
            name: category.name().as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
    /// Visible leads without a category.
    pub unassigned_lead_count: u64,
    /// Visible leads with a category.
    pub lead_count: u64,
}

impl From<CategoryListing> for CategoryListResponse {
    fn from(listing: CategoryListing) -> Self {
        Self {
            categories: listing.categories.iter().map(CategoryResponse::from).collect(),
            unassigned_lead_count: listing.unassigned_lead_count,
            lead_count: listing.lead_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub leads: Vec<LeadResponse>,
}

impl From<CategoryDetail> for CategoryDetailResponse {
    fn from(detail: CategoryDetail) -> Self {
        Self {
            category: CategoryResponse::from(&detail.category),
            leads: lead_responses(&detail.leads),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/categories/",
    responses(
        (status = 200, description = "Categories with lead counts", body = CategoryListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/leads/categories/")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CategoryListResponse>> {
    let caller = current_caller(&state, &session).await?;
    let listing = state.categories_query.list_categories(&caller).await?;
    Ok(web::Json(listing.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads/create-category/",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse,
            headers(("Location" = String, description = "Category list"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/leads/create-category/")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    let name = CategoryName::new(&payload.name)?;
    let category = state.categories.create_category(&caller, name).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, CATEGORY_LIST_PATH))
        .json(CategoryResponse::from(&category)))
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category and its visible leads", body = CategoryDetailResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "categoryDetail"
)]
#[get(r"/leads/categories/{id:\d+}")]
pub async fn category_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CategoryDetailResponse>> {
    let caller = current_caller(&state, &session).await?;
    let detail = state
        .categories_query
        .category_detail(&caller, CategoryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(detail.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads/categories/{id}/update",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Renamed category", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[post(r"/leads/categories/{id:\d+}/update")]
pub async fn update_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let caller = current_caller(&state, &session).await?;
    let name = CategoryName::new(&payload.name)?;
    let category = state
        .categories
        .update_category(&caller, CategoryId::new(path.into_inner()), name)
        .await?;
    Ok(web::Json(CategoryResponse::from(&category)))
}

/// Delete a category; its leads stay, uncategorised.
#[utoipa::path(
    post,
    path = "/api/v1/leads/categories/{id}/delete",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 403, description = "Organisor role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[post(r"/leads/categories/{id:\d+}/delete")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = current_caller(&state, &session).await?;
    state
        .categories
        .delete_category(&caller, CategoryId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
