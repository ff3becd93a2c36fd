use std::collections::HashMap;

use chrono::NaiveDate;

use super::cell::{count_date, safe_int, trimmed_text, CellValue};

const ABSENT: CellValue = CellValue::Absent;

/// One raw sheet row addressed by column name. Columns missing from the
/// sheet entirely read as absent cells, which the coercion rules turn into
/// their defaults.
pub struct RawRow<'a> {
    header_index: &'a HashMap<String, usize>,
    cells: &'a [CellValue],
}

impl<'a> RawRow<'a> {
    pub fn new(header_index: &'a HashMap<String, usize>, cells: &'a [CellValue]) -> Self {
        Self { header_index, cells }
    }

    fn get(&self, column: &str) -> &CellValue {
        self.header_index
            .get(column)
            .and_then(|idx| self.cells.get(*idx))
            .unwrap_or(&ABSENT)
    }
}

/// The normalized payload of one inventory row, ready for persistence.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRow {
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
}

/// Normalizes one raw row, or returns `None` when the row must be skipped
/// (SKU absent or blank after trimming). Cell-level problems are never
/// errors here; they degrade to empty string / `"Unknown"` / 0 / no date.
pub fn normalize_row(row: &RawRow<'_>) -> Option<NormalizedRow> {
    let sku = trimmed_text(row.get("SKU"));
    if sku.is_empty() {
        return None;
    }

    let stock_status = match row.get("StockStatus") {
        CellValue::Absent => "Unknown".to_string(),
        value => trimmed_text(value),
    };

    Some(NormalizedRow {
        sku,
        description: trimmed_text(row.get("Description")),
        category: trimmed_text(row.get("Category")),
        last_count_date: count_date(row.get("LastCountDate")),
        last_count: safe_int(row.get("LastCount")),
        total_container_qty: safe_int(row.get("TotalContainerQty")),
        container_details: trimmed_text(row.get("ContainerDetails")),
        final_expected_count: safe_int(row.get("Final Expected Count")),
        on_hand_qty: safe_int(row.get("Kenneth's Inventory")),
        buffer_qty: safe_int(row.get("BufferQty")),
        stock_status,
        remark: trimmed_text(row.get("InventoryRemark")),
    })
}

/// Builds the column-name -> cell-index map from a header row.
pub fn header_index(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), idx))
        .collect()
}
