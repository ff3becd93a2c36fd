use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use crate::{
    entities::print_request::PrintItem, errors::ServiceError, ApiResponse, AppState,
};

use super::ActingUser;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePrintRequest {
    #[validate(length(min = 1, max = 500, message = "between 1 and 500 SKUs per request"))]
    pub skus: Vec<PrintItem>,
    pub notes: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "manual".to_string()
}

pub async fn create_print_request(
    State(state): State<AppState>,
    user: ActingUser,
    Json(request): Json<CreatePrintRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    let created = state
        .print_requests
        .create(
            request.skus,
            request.notes,
            &user.name,
            &user.id,
            &request.source,
        )
        .await?;
    Ok(Json(ApiResponse::success(created)))
}
