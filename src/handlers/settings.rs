use axum::{extract::State, response::IntoResponse, Json};

use crate::{errors::ServiceError, ApiResponse, AppState};

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let branding = state.settings.load().await?;
    Ok(Json(ApiResponse::success(branding)))
}
