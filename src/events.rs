use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Events the core reports to the external activity logger. Delivery is
/// fire-and-forget: the ingestion transaction never waits on a consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SnapshotIngested {
        snapshot_id: Uuid,
        filename: String,
        record_count: i32,
        uploaded_by: String,
    },
    SnapshotDeleted {
        snapshot_id: Uuid,
        filename: String,
        record_count: i32,
    },
    PrintRequestCreated {
        request_id: String,
        sku_count: i32,
        requested_by: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes events and writes the structured activity records. Runs as one
/// spawned task for the life of the process.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match event {
            Event::SnapshotIngested {
                snapshot_id,
                filename,
                record_count,
                uploaded_by,
            } => {
                info!(
                    action = "UPLOAD_FILE",
                    %snapshot_id,
                    user = %uploaded_by,
                    detail = %format!("Uploaded file: {}. Records: {}", filename, record_count),
                    "activity"
                );
            }
            Event::SnapshotDeleted {
                snapshot_id,
                filename,
                record_count,
            } => {
                info!(
                    action = "DELETE_FILE",
                    %snapshot_id,
                    detail = %format!("Deleted file: {} with {} records", filename, record_count),
                    "activity"
                );
            }
            Event::PrintRequestCreated {
                request_id,
                sku_count,
                requested_by,
            } => {
                info!(
                    action = "CREATE_PRINT_REQUEST",
                    user = %requested_by,
                    detail = %format!("Created print request {} with {} items", request_id, sku_count),
                    "activity"
                );
            }
        }
    }
}
