use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded stock workbook. The snapshot date is parsed from the
/// filename exactly once at ingestion and never recomputed; `record_count`
/// equals the number of rows that survived normalization (blank-SKU rows
/// are skipped and do not count).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub filename: String,
    pub snapshot_date: Date,
    pub record_count: i32,
    pub uploaded_at: DateTimeUtc,
    pub uploaded_by: String,
    pub file_size: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_record::Entity")]
    InventoryRecord,
}

impl Related<super::inventory_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
