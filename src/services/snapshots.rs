use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    entities::{
        inventory_record::{self, Entity as InventoryRecord},
        snapshot::{self, Entity as Snapshot},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

use super::search::latest_snapshot;

/// Listing entry for the snapshot picker.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: Uuid,
    pub filename: String,
    pub snapshot_date: NaiveDate,
    pub display_date: String,
    pub record_count: i32,
    pub uploaded_at: String,
    pub uploaded_by: String,
    pub file_size: i64,
}

impl From<snapshot::Model> for SnapshotSummary {
    fn from(m: snapshot::Model) -> Self {
        Self {
            id: m.id,
            display_date: m.snapshot_date.format("%b %d, %Y").to_string(),
            snapshot_date: m.snapshot_date,
            filename: m.filename,
            record_count: m.record_count,
            uploaded_at: m.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            uploaded_by: m.uploaded_by,
            file_size: m.file_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedSnapshot {
    pub id: Uuid,
    pub filename: String,
    pub record_count: u64,
}

/// Administration over stored snapshots: listing, current-file resolution
/// and cascading deletion.
#[derive(Clone)]
pub struct SnapshotService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl SnapshotService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// All snapshots, newest date first; same-date ties fall back to the
    /// most recently uploaded.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SnapshotSummary>, ServiceError> {
        let db = &*self.db;
        let snapshots = Snapshot::find()
            .order_by_desc(snapshot::Column::SnapshotDate)
            .order_by_desc(snapshot::Column::UploadedAt)
            .all(db)
            .await?;
        Ok(snapshots.into_iter().map(Into::into).collect())
    }

    /// The snapshot search defaults to when no explicit id is given.
    pub async fn latest(&self) -> Result<Option<snapshot::Model>, ServiceError> {
        latest_snapshot(&self.db).await
    }

    /// Bare SKU list of a snapshot, for bulk-search previews.
    #[instrument(skip(self))]
    pub async fn skus(&self, snapshot_id: Uuid) -> Result<Vec<String>, ServiceError> {
        let db = &*self.db;
        let records = InventoryRecord::find()
            .filter(inventory_record::Column::SnapshotId.eq(snapshot_id))
            .order_by_asc(inventory_record::Column::Sku)
            .all(db)
            .await?;
        Ok(records.into_iter().map(|r| r.sku).collect())
    }

    /// Deletes a snapshot and every inventory row it owns in one
    /// transaction. The child delete is explicit so the cascade holds even
    /// on backends with foreign keys disabled.
    #[instrument(skip(self))]
    pub async fn delete(&self, snapshot_id: Uuid) -> Result<DeletedSnapshot, ServiceError> {
        let db = &*self.db;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, %snapshot_id, "failed to start delete transaction");
            ServiceError::DatabaseError(e)
        })?;

        let target = Snapshot::find_by_id(snapshot_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Snapshot {} not found", snapshot_id)))?;

        let removed = InventoryRecord::delete_many()
            .filter(inventory_record::Column::SnapshotId.eq(snapshot_id))
            .exec(&txn)
            .await?
            .rows_affected;

        let filename = target.filename.clone();
        target.delete(&txn).await?;

        txn.commit().await?;

        info!(%snapshot_id, removed, "snapshot deleted");

        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender
                .send(Event::SnapshotDeleted {
                    snapshot_id,
                    filename: filename.clone(),
                    record_count: removed as i32,
                })
                .await
            {
                warn!(error = %e, %snapshot_id, "failed to send delete event");
            }
        }

        Ok(DeletedSnapshot {
            id: snapshot_id,
            filename,
            record_count: removed,
        })
    }
}
