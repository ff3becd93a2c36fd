use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-row branding configuration (id is always 1). Read on demand per
/// request rather than cached process-wide, so an admin edit is visible on
/// the next request without a restart.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub system_name: String,
    pub logo_path: String,
    pub primary_color: String,
    pub success_color: String,
    pub warning_color: String,
    pub danger_color: String,
    pub updated_at: DateTimeUtc,
}

pub const SETTINGS_ROW_ID: i32 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
