use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Derived three-way stock classification. Never stored; always recomputed
/// from `available_stock` and `buffer_qty` so the buckets cannot drift from
/// the underlying quantities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    LowStock,
    InStock,
}

/// One SKU's state within one snapshot. The natural key is
/// (snapshot_id, sku); the same SKU reappears in every snapshot it was
/// present in. Numeric columns are NOT NULL with default 0 — absent or
/// unparseable cells coerce to exactly 0 at ingestion, never to NULL, so
/// the derived classification below is total.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub snapshot_id: Uuid,
    pub sku: String,
    pub description: String,
    pub category: String,
    pub last_count_date: Option<Date>,
    pub last_count: i32,
    pub total_container_qty: i32,
    #[sea_orm(column_type = "Text")]
    pub container_details: String,
    pub final_expected_count: i32,
    pub on_hand_qty: i32,
    pub buffer_qty: i32,
    pub stock_status: String,
    #[sea_orm(column_type = "Text")]
    pub remark: String,
    /// Denormalized from the parent snapshot for query convenience.
    pub snapshot_date: Date,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// On-hand quantity plus incoming container quantity.
    pub fn available_stock(&self) -> i32 {
        self.on_hand_qty + self.total_container_qty
    }

    pub fn stock_level(&self) -> StockLevel {
        let avail = self.available_stock();
        if avail <= 0 {
            StockLevel::OutOfStock
        } else if avail <= self.buffer_qty {
            StockLevel::LowStock
        } else {
            StockLevel::InStock
        }
    }

    pub fn has_incoming(&self) -> bool {
        self.total_container_qty > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::snapshot::Entity",
        from = "Column::SnapshotId",
        to = "super::snapshot::Column::Id",
        on_delete = "Cascade"
    )]
    Snapshot,
}

impl Related<super::snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn record(on_hand: i32, container: i32, buffer: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            snapshot_id: Uuid::new_v4(),
            sku: "SKU-1".to_string(),
            description: String::new(),
            category: String::new(),
            last_count_date: None,
            last_count: 0,
            total_container_qty: container,
            container_details: String::new(),
            final_expected_count: 0,
            on_hand_qty: on_hand,
            buffer_qty: buffer,
            stock_status: "Unknown".to_string(),
            remark: String::new(),
            snapshot_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn available_stock_sums_on_hand_and_incoming() {
        assert_eq!(record(7, 3, 0).available_stock(), 10);
        assert_eq!(record(0, 0, 5).available_stock(), 0);
    }

    #[test]
    fn stock_level_boundaries() {
        // avail == buffer -> low, avail == buffer + 1 -> in stock
        assert_eq!(record(10, 0, 10).stock_level(), StockLevel::LowStock);
        assert_eq!(record(11, 0, 10).stock_level(), StockLevel::InStock);
        // avail == 0 -> out of stock regardless of buffer
        assert_eq!(record(0, 0, 10).stock_level(), StockLevel::OutOfStock);
        assert_eq!(record(-4, 2, 0).stock_level(), StockLevel::OutOfStock);
    }

    #[test]
    fn has_incoming_tracks_container_qty() {
        assert!(record(0, 1, 0).has_incoming());
        assert!(!record(5, 0, 0).has_incoming());
    }

    #[test]
    fn stock_level_serializes_snake_case() {
        assert_eq!(StockLevel::OutOfStock.to_string(), "out_of_stock");
        assert_eq!(
            serde_json::to_string(&StockLevel::LowStock).unwrap(),
            r#""low_stock""#
        );
    }
}
