use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use stockcheck_api::{
    api_v1_routes,
    config::AppConfig,
    db, events,
    ingest::{schema::REQUIRED_COLUMNS, CellValue, IngestOutcome},
    AppState,
};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Test harness backed by a throwaway SQLite database. Each instance gets
/// its own file under a temp dir, so tests never share state.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let db_path = tmp.path().join("stockcheck_test.db");
        let upload_dir = tmp.path().join("uploads");

        let cfg = AppConfig {
            database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            auto_migrate: true,
            upload_dir: upload_dir.display().to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            db_max_connections: 1,
            db_min_connections: 1,
        };

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = events::EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), Arc::new(cfg), Some(event_sender));
        let router = Router::new()
            .nest("/api/v1", api_v1_routes())
            .with_state(state.clone());

        Self {
            state,
            router,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    /// Drives a request through the full router and decodes the JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response was not JSON")
        };
        (status, json)
    }

    /// Posts a single `file` field as multipart form data.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> (StatusCode, Value) {
        let boundary = "test-boundary-7a3f";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/snapshots")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("failed to build upload request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = serde_json::from_slice(&bytes).expect("response was not JSON");
        (status, json)
    }

    /// Ingests a well-formed sheet directly through the pipeline core.
    pub async fn ingest(
        &self,
        snapshot_date: NaiveDate,
        filename: &str,
        rows: Vec<Vec<CellValue>>,
    ) -> IngestOutcome {
        self.state
            .ingestor
            .ingest_sheet(snapshot_date, sheet_headers(), rows, filename, 1024, "tester")
            .await
            .expect("ingestion failed")
    }
}

/// The required header row in canonical column order.
pub fn sheet_headers() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect()
}

/// Builds one data row aligned with `sheet_headers()`.
pub fn sheet_row(
    sku: &str,
    on_hand: i64,
    container_qty: i64,
    buffer: i64,
    status: &str,
) -> Vec<CellValue> {
    vec![
        CellValue::Text(sku.to_string()),            // SKU
        CellValue::Text("03/15/24".to_string()),     // LastCountDate
        CellValue::Integer(on_hand),                 // LastCount
        CellValue::Integer(container_qty),           // TotalContainerQty
        CellValue::Text("40HQ x1".to_string()),      // ContainerDetails
        CellValue::Integer(on_hand + container_qty), // Final Expected Count
        CellValue::Integer(on_hand),                 // Kenneth's Inventory
        CellValue::Text(status.to_string()),         // StockStatus
        CellValue::Text("".to_string()),             // InventoryRemark
        CellValue::Text(format!("Widget {sku}")),    // Description
        CellValue::Text("Widgets".to_string()),      // Category
        CellValue::Integer(buffer),                  // BufferQty
    ]
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
