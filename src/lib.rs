use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use serde::Serialize;

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod ingest;
pub mod migrator;
pub mod services;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::ingest::SnapshotIngestor;
use crate::services::{
    print_requests::PrintRequestService, search::SearchService, settings::SettingsService,
    snapshots::SnapshotService,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub event_sender: Option<EventSender>,
    pub ingestor: SnapshotIngestor,
    pub search: SearchService,
    pub snapshots: SnapshotService,
    pub settings: SettingsService,
    pub print_requests: PrintRequestService,
}

impl AppState {
    pub fn new(
        db: Arc<sea_orm::DatabaseConnection>,
        config: Arc<AppConfig>,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            ingestor: SnapshotIngestor::new(db.clone(), event_sender.clone()),
            search: SearchService::new(db.clone()),
            snapshots: SnapshotService::new(db.clone(), event_sender.clone()),
            settings: SettingsService::new(db.clone()),
            print_requests: PrintRequestService::new(db.clone(), event_sender.clone()),
            db,
            config,
            event_sender,
        }
    }
}

/// Standard response envelope.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Versioned API surface, mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    handlers::routes()
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_response_carries_message() {
        let response: ApiResponse<()> = ApiResponse::error("boom".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("boom"));
    }
}
