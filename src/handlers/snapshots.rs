use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{errors::ServiceError, ApiResponse, AppState};

use super::ActingUser;

/// Spreadsheet formats the platform accepts.
const ALLOWED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub snapshot_id: Uuid,
    pub record_count: i32,
    pub snapshot_date: NaiveDate,
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Accepts one multipart `file` field, stages it under the upload dir and
/// hands it to the ingestor. The staged copy is the ingestor's to clean up
/// after a successful commit.
pub async fn upload_snapshot(
    State(state): State<AppState>,
    user: ActingUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ServiceError::InvalidInput("No file selected".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::InvalidInput(format!("failed to read upload: {}", e)))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ServiceError::InvalidInput("No file selected".to_string()))?;

    if !allowed_file(&filename) {
        return Err(ServiceError::InvalidInput(
            "Invalid file type. Please upload .xlsx or .xls files.".to_string(),
        ));
    }

    std::fs::create_dir_all(&state.config.upload_dir)
        .map_err(|e| ServiceError::InternalError(format!("cannot create upload dir: {}", e)))?;
    let staged = std::path::Path::new(&state.config.upload_dir)
        .join(format!("{}_{}", Uuid::new_v4(), filename));
    std::fs::write(&staged, &bytes)
        .map_err(|e| ServiceError::InternalError(format!("cannot stage upload: {}", e)))?;

    info!(filename = %filename, size = bytes.len(), user = %user.name, "processing upload");

    let outcome = state
        .ingestor
        .ingest_file(&staged, &filename, &user.name)
        .await?;

    Ok(Json(ApiResponse::success(UploadResponse {
        snapshot_id: outcome.snapshot_id,
        record_count: outcome.record_count,
        snapshot_date: outcome.snapshot_date,
    })))
}

pub async fn list_snapshots(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let snapshots = state.snapshots.list().await?;
    Ok(Json(ApiResponse::success(snapshots)))
}

pub async fn delete_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let deleted = state.snapshots.delete(id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}

pub async fn snapshot_skus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let skus = state.snapshots.skus(id).await?;
    Ok(Json(ApiResponse::success(skus)))
}
