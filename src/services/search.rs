use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        inventory_record::{self, Entity as InventoryRecord, StockLevel},
        snapshot::{self, Entity as Snapshot},
    },
    errors::ServiceError,
};

/// Full record detail returned by search, comparison and bulk lookup,
/// including the derived classification fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDetail {
    pub id: Uuid,
    pub sku: String,
    pub description: String,
    pub category: String,
    pub last_count_date: Option<NaiveDate>,
    pub last_count: i32,
    pub total_container_qty: i32,
    pub container_details: String,
    pub final_expected_count: i32,
    pub on_hand_qty: i32,
    pub buffer_qty: i32,
    pub stock_status: String,
    pub remark: String,
    pub snapshot_date: NaiveDate,
    pub available_stock: i32,
    pub stock_level: StockLevel,
    pub has_incoming: bool,
}

impl From<inventory_record::Model> for InventoryItemDetail {
    fn from(m: inventory_record::Model) -> Self {
        let available_stock = m.available_stock();
        let stock_level = m.stock_level();
        let has_incoming = m.has_incoming();
        Self {
            id: m.id,
            sku: m.sku,
            description: m.description,
            category: m.category,
            last_count_date: m.last_count_date,
            last_count: m.last_count,
            total_container_qty: m.total_container_qty,
            container_details: m.container_details,
            final_expected_count: m.final_expected_count,
            on_hand_qty: m.on_hand_qty,
            buffer_qty: m.buffer_qty,
            stock_status: m.stock_status,
            remark: m.remark,
            snapshot_date: m.snapshot_date,
            available_stock,
            stock_level,
            has_incoming,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<InventoryItemDetail>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    /// The snapshot the results came from; `None` when none exist yet.
    pub snapshot_id: Option<Uuid>,
}

impl SearchPage {
    fn empty(page: u64, page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
            total_pages: 0,
            snapshot_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increase,
    Decrease,
    NoChange,
}

/// One side of a comparison; absent when the SKU was not present in that
/// snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompareSide {
    pub snapshot_id: Uuid,
    pub snapshot_date: NaiveDate,
    pub available_stock: i32,
    pub on_hand_qty: i32,
    pub total_container_qty: i32,
    pub container_details: String,
    pub buffer_qty: i32,
    pub stock_status: String,
    pub stock_level: StockLevel,
}

impl From<inventory_record::Model> for CompareSide {
    fn from(m: inventory_record::Model) -> Self {
        Self {
            snapshot_id: m.snapshot_id,
            snapshot_date: m.snapshot_date,
            available_stock: m.available_stock(),
            stock_level: m.stock_level(),
            on_hand_qty: m.on_hand_qty,
            total_container_qty: m.total_container_qty,
            container_details: m.container_details,
            buffer_qty: m.buffer_qty,
            stock_status: m.stock_status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub sku: String,
    pub first: Option<CompareSide>,
    pub second: Option<CompareSide>,
    /// `second.available_stock - first.available_stock`; `None` unless both
    /// sides are present.
    pub difference: Option<i32>,
    pub trend: Trend,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkSearchResult {
    pub found: Vec<InventoryItemDetail>,
    pub not_found: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StockStats {
    pub total_skus: u64,
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

/// Largest page a single search request may fetch; oversized values are
/// clamped rather than rejected, matching the bulk-lookup batch limit.
pub const MAX_PAGE_SIZE: u64 = 500;

/// Read side over ingested snapshots: free-text search, cross-snapshot
/// comparison, bulk lookup and stock-level statistics. Storage failures
/// surface as errors here; collapsing them to empty pages is a caller
/// decision, not a service one.
#[derive(Clone)]
pub struct SearchService {
    db: Arc<DatabaseConnection>,
}

impl SearchService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Searches a snapshot's records with an optional case-insensitive
    /// free-text filter over SKU, description, category and remark.
    /// Results are ordered by SKU ascending; `page` is 1-indexed and
    /// `page_size` is clamped to [1, MAX_PAGE_SIZE].
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        free_text: &str,
        snapshot_id: Option<Uuid>,
        page: u64,
        page_size: u64,
    ) -> Result<SearchPage, ServiceError> {
        let db = &*self.db;
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let target = match snapshot_id {
            Some(id) => id,
            None => match latest_snapshot(db).await? {
                Some(s) => s.id,
                None => return Ok(SearchPage::empty(page, page_size)),
            },
        };

        let mut query = InventoryRecord::find()
            .filter(inventory_record::Column::SnapshotId.eq(target));

        let needle = free_text.trim();
        if !needle.is_empty() {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(inventory_record::Column::Sku, needle))
                    .add(contains_ci(inventory_record::Column::Description, needle))
                    .add(contains_ci(inventory_record::Column::Category, needle))
                    .add(contains_ci(inventory_record::Column::Remark, needle)),
            );
        }

        let paginator = query
            .order_by_asc(inventory_record::Column::Sku)
            .paginate(db, page_size);

        let totals = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(SearchPage {
            items: items.into_iter().map(Into::into).collect(),
            total: totals.number_of_items,
            page,
            page_size,
            total_pages: totals.number_of_pages,
            snapshot_id: Some(target),
        })
    }

    /// Looks up one SKU independently in two snapshots and classifies the
    /// movement of available stock between them. A side missing the SKU is
    /// reported absent, with the trend collapsing to `NoChange`.
    #[instrument(skip(self))]
    pub async fn compare(
        &self,
        sku: &str,
        snapshot_a: Uuid,
        snapshot_b: Uuid,
    ) -> Result<ComparisonResult, ServiceError> {
        let db = &*self.db;

        let first = find_record(db, snapshot_a, sku).await?;
        let second = find_record(db, snapshot_b, sku).await?;

        let difference = match (&first, &second) {
            (Some(a), Some(b)) => Some(b.available_stock() - a.available_stock()),
            _ => None,
        };
        let trend = match difference {
            Some(d) if d > 0 => Trend::Increase,
            Some(d) if d < 0 => Trend::Decrease,
            _ => Trend::NoChange,
        };

        Ok(ComparisonResult {
            sku: sku.to_string(),
            first: first.map(Into::into),
            second: second.map(Into::into),
            difference,
            trend,
        })
    }

    /// Exact-match lookup of a SKU list within one snapshot. Input SKUs are
    /// trimmed and deduplicated; matching is case-sensitive. No size cap is
    /// applied at this layer.
    #[instrument(skip(self, skus), fields(requested = skus.len()))]
    pub async fn bulk_search(
        &self,
        skus: &[String],
        snapshot_id: Uuid,
    ) -> Result<BulkSearchResult, ServiceError> {
        let db = &*self.db;

        let mut seen = HashSet::new();
        let cleaned: Vec<String> = skus
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();

        if cleaned.is_empty() {
            return Ok(BulkSearchResult {
                found: Vec::new(),
                not_found: Vec::new(),
                total: 0,
            });
        }

        let records = InventoryRecord::find()
            .filter(inventory_record::Column::SnapshotId.eq(snapshot_id))
            .filter(inventory_record::Column::Sku.is_in(cleaned.clone()))
            .all(db)
            .await?;

        let mut by_sku: HashMap<String, inventory_record::Model> =
            records.into_iter().map(|r| (r.sku.clone(), r)).collect();

        let mut found = Vec::new();
        let mut not_found = Vec::new();
        for sku in &cleaned {
            match by_sku.remove(sku) {
                Some(record) => found.push(record.into()),
                None => not_found.push(sku.clone()),
            }
        }

        info!(
            requested = cleaned.len(),
            found = found.len(),
            not_found = not_found.len(),
            "bulk search complete"
        );

        Ok(BulkSearchResult {
            total: cleaned.len(),
            found,
            not_found,
        })
    }

    /// Counts a snapshot's records per stock-level bucket in a single pass.
    #[instrument(skip(self))]
    pub async fn get_stats(&self, snapshot_id: Uuid) -> Result<StockStats, ServiceError> {
        let db = &*self.db;

        let records = InventoryRecord::find()
            .filter(inventory_record::Column::SnapshotId.eq(snapshot_id))
            .all(db)
            .await?;

        let mut stats = StockStats {
            total_skus: records.len() as u64,
            in_stock: 0,
            low_stock: 0,
            out_of_stock: 0,
        };
        for record in &records {
            match record.stock_level() {
                StockLevel::InStock => stats.in_stock += 1,
                StockLevel::LowStock => stats.low_stock += 1,
                StockLevel::OutOfStock => stats.out_of_stock += 1,
            }
        }

        Ok(stats)
    }
}

/// Most recent snapshot by date, ties broken by upload time. Multiple
/// snapshots on one date are legal.
pub async fn latest_snapshot(
    db: &DatabaseConnection,
) -> Result<Option<snapshot::Model>, ServiceError> {
    Ok(Snapshot::find()
        .order_by_desc(snapshot::Column::SnapshotDate)
        .order_by_desc(snapshot::Column::UploadedAt)
        .one(db)
        .await?)
}

async fn find_record(
    db: &DatabaseConnection,
    snapshot_id: Uuid,
    sku: &str,
) -> Result<Option<inventory_record::Model>, ServiceError> {
    Ok(InventoryRecord::find()
        .filter(inventory_record::Column::SnapshotId.eq(snapshot_id))
        .filter(inventory_record::Column::Sku.eq(sku))
        .one(db)
        .await?)
}

/// Case-insensitive substring match, portable across Postgres and SQLite.
/// The needle is embedded into the LIKE pattern as-is, so `%` and `_` keep
/// their wildcard meaning — the upstream search contract, not an oversight.
fn contains_ci(column: inventory_record::Column, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((inventory_record::Entity, column))))
        .like(format!("%{}%", needle.to_lowercase()))
}
