use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub snapshot_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

pub async fn search_inventory(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state
        .search
        .search(&query.q, query.snapshot_id, query.page, query.page_size)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub sku: String,
    pub first: Uuid,
    pub second: Uuid,
}

pub async fn compare_sku(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let sku = query.sku.trim();
    if sku.is_empty() {
        return Err(ServiceError::InvalidInput("SKU is required".to_string()));
    }
    let result = state.search.compare(sku, query.first, query.second).await?;
    Ok(Json(ApiResponse::success(result)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkSearchRequest {
    /// Caller policy caps the batch; the engine itself is uncapped.
    #[validate(length(min = 1, max = 500, message = "between 1 and 500 SKUs per request"))]
    pub skus: Vec<String>,
    pub snapshot_id: Uuid,
}

pub async fn bulk_search(
    State(state): State<AppState>,
    Json(request): Json<BulkSearchRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    let result = state
        .search
        .bulk_search(&request.skus, request.snapshot_id)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn snapshot_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let stats = state.search.get_stats(id).await?;
    Ok(Json(ApiResponse::success(stats)))
}
