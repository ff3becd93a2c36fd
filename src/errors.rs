use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Additional detail (e.g. the full list of missing columns)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Failures of the ingestion pipeline that abort an upload before or during
/// persistence. All variants are user-correctable; storage failures travel
/// through `ServiceError::DatabaseError` instead.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid filename format: {0} (expected CheckStockTempFile_MM-DD-YY.<ext>)")]
    InvalidFilenameFormat(String),

    #[error("could not read workbook: {0}")]
    UnreadableWorkbook(String),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Ingest(e) => match e {
                IngestError::MissingColumns(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Message suitable for HTTP responses. Internal errors return generic
    /// text; the underlying cause stays in the logs.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Ingest(IngestError::MissingColumns(cols)) => {
                Some(serde_json::json!(cols).to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: self.response_message(),
            details: self.details(),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_surfaces_full_list() {
        let err = ServiceError::from(IngestError::MissingColumns(vec![
            "BufferQty".to_string(),
            "SKU".to_string(),
        ]));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("BufferQty, SKU"));
        assert_eq!(err.details().unwrap(), r#"["BufferQty","SKU"]"#);
    }

    #[test]
    fn database_errors_hide_internals() {
        let err = ServiceError::DatabaseError(sea_orm::DbErr::Custom("secret dsn".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response_message(), "Database error");
    }
}
