use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    entities::{inventory_record, snapshot},
    errors::{IngestError, ServiceError},
    events::{Event, EventSender},
};

use super::{
    cell::CellValue,
    filename::snapshot_date_from_filename,
    normalizer::{header_index, normalize_row, RawRow},
    schema::validate_headers,
};

/// Rows are flushed to storage in fixed-size batches to bound memory use
/// on large sheets. All batches share one transaction.
const INSERT_BATCH_SIZE: usize = 500;

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub snapshot_id: Uuid,
    pub record_count: i32,
    pub snapshot_date: NaiveDate,
}

/// Orchestrates the upload pipeline: filename date parse, workbook load,
/// schema validation, per-row normalization and transactional persistence.
/// Either the snapshot and every surviving row commit together, or nothing
/// from the attempt remains visible.
#[derive(Clone)]
pub struct SnapshotIngestor {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl SnapshotIngestor {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Ingests an uploaded workbook from a temp file. On success the temp
    /// file is deleted; a cleanup failure is logged and ignored since the
    /// ingestion is already durable at that point.
    #[instrument(skip(self), fields(filename = %original_filename))]
    pub async fn ingest_file(
        &self,
        path: &Path,
        original_filename: &str,
        uploaded_by: &str,
    ) -> Result<IngestOutcome, ServiceError> {
        // Validate the filename before touching the workbook bytes.
        let snapshot_date = snapshot_date_from_filename(original_filename)?;

        let file_size = std::fs::metadata(path).map(|m| m.len() as i64).unwrap_or(0);
        let (headers, rows) = load_sheet(path)?;

        let outcome = self
            .ingest_sheet(
                snapshot_date,
                headers,
                rows,
                original_filename,
                file_size,
                uploaded_by,
            )
            .await?;

        if let Err(e) = std::fs::remove_file(path) {
            warn!(error = %e, path = %path.display(), "could not delete temp upload");
        }

        Ok(outcome)
    }

    /// Workbook-independent core of the pipeline: validates headers and
    /// persists the snapshot plus all normalized rows in one transaction.
    #[instrument(skip(self, headers, rows), fields(filename = %original_filename, rows = rows.len()))]
    pub async fn ingest_sheet(
        &self,
        snapshot_date: NaiveDate,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        original_filename: &str,
        file_size: i64,
        uploaded_by: &str,
    ) -> Result<IngestOutcome, ServiceError> {
        validate_headers(&headers)?;

        let db = &*self.db;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start ingestion transaction");
            ServiceError::DatabaseError(e)
        })?;

        let snapshot_id = Uuid::new_v4();
        let now = Utc::now();

        snapshot::ActiveModel {
            id: Set(snapshot_id),
            filename: Set(original_filename.to_string()),
            snapshot_date: Set(snapshot_date),
            record_count: Set(0),
            uploaded_at: Set(now),
            uploaded_by: Set(uploaded_by.to_string()),
            file_size: Set(file_size),
        }
        .insert(&txn)
        .await?;

        let index = header_index(&headers);
        let mut batch: Vec<inventory_record::ActiveModel> = Vec::with_capacity(INSERT_BATCH_SIZE);
        let mut record_count: i32 = 0;

        for cells in &rows {
            let raw = RawRow::new(&index, cells);
            let Some(row) = normalize_row(&raw) else {
                continue;
            };
            record_count += 1;

            batch.push(inventory_record::ActiveModel {
                id: Set(Uuid::new_v4()),
                snapshot_id: Set(snapshot_id),
                sku: Set(row.sku),
                description: Set(row.description),
                category: Set(row.category),
                last_count_date: Set(row.last_count_date),
                last_count: Set(row.last_count),
                total_container_qty: Set(row.total_container_qty),
                container_details: Set(row.container_details),
                final_expected_count: Set(row.final_expected_count),
                on_hand_qty: Set(row.on_hand_qty),
                buffer_qty: Set(row.buffer_qty),
                stock_status: Set(row.stock_status),
                remark: Set(row.remark),
                snapshot_date: Set(snapshot_date),
                created_at: Set(now),
            });

            if batch.len() >= INSERT_BATCH_SIZE {
                inventory_record::Entity::insert_many(std::mem::take(&mut batch))
                    .exec(&txn)
                    .await?;
            }
        }

        if !batch.is_empty() {
            inventory_record::Entity::insert_many(batch).exec(&txn).await?;
        }

        // record_count reflects the non-skipped rows, not the sheet length.
        snapshot::ActiveModel {
            id: Set(snapshot_id),
            record_count: Set(record_count),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, %snapshot_id, "failed to commit ingestion transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(%snapshot_id, record_count, %snapshot_date, "snapshot ingested");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::SnapshotIngested {
                    snapshot_id,
                    filename: original_filename.to_string(),
                    record_count,
                    uploaded_by: uploaded_by.to_string(),
                })
                .await
            {
                warn!(error = %e, %snapshot_id, "failed to send ingestion event");
            }
        }

        Ok(IngestOutcome {
            snapshot_id,
            record_count,
            snapshot_date,
        })
    }
}

/// Loads the first worksheet into a header row plus tagged cell rows.
/// Any parse failure at this level means the bytes are not a workbook.
fn load_sheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<CellValue>>), IngestError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::UnreadableWorkbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::UnreadableWorkbook("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::UnreadableWorkbook(e.to_string()))?;

    let mut rows = range.rows();

    // Header cells are taken verbatim; schema matching does not normalize.
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| IngestError::UnreadableWorkbook("sheet has no header row".to_string()))?
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.clone(),
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Ok((headers, data))
}
