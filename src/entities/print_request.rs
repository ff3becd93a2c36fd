use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// One (SKU, quantity) pair inside a print request payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintItem {
    pub sku: String,
    pub qty: i32,
}

/// A batch of SKUs queued for pick-list printing. The approval workflow
/// (pending -> approved -> printed -> completed) lives outside this crate;
/// only the data shape and creation are modeled here, as a consumer of
/// search results.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "print_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub request_id: String,
    pub requested_by: String,
    pub requested_by_id: String,
    pub requested_at: DateTimeUtc,
    pub status: String,
    /// JSON array of `PrintItem` objects.
    #[sea_orm(column_type = "Text")]
    pub sku_list: String,
    pub sku_count: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub source_type: String,
}

impl Model {
    pub fn sku_items(&self) -> Vec<PrintItem> {
        serde_json::from_str(&self.sku_list).unwrap_or_default()
    }
}

/// Serializes an item list into the stored JSON payload form.
pub fn encode_sku_items(items: &[PrintItem]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn sku_items_round_trip() {
        let items = vec![
            PrintItem { sku: "A1".into(), qty: 3 },
            PrintItem { sku: "B2".into(), qty: 1 },
        ];
        let model = Model {
            id: Uuid::new_v4(),
            request_id: "PR-20240315-0001".into(),
            requested_by: "kenneth".into(),
            requested_by_id: "u-1".into(),
            requested_at: Utc::now(),
            status: "pending".into(),
            sku_list: encode_sku_items(&items),
            sku_count: items.len() as i32,
            notes: None,
            source_type: "manual".into(),
        };
        assert_eq!(model.sku_items(), items);
    }

    #[test]
    fn malformed_payload_decodes_to_empty() {
        let model = Model {
            id: Uuid::new_v4(),
            request_id: "PR-20240315-0002".into(),
            requested_by: "kenneth".into(),
            requested_by_id: "u-1".into(),
            requested_at: Utc::now(),
            status: "pending".into(),
            sku_list: "not json".into(),
            sku_count: 0,
            notes: None,
            source_type: "manual".into(),
        };
        assert!(model.sku_items().is_empty());
    }
}
