use crate::errors::IngestError;

/// Columns every stock workbook must carry. Matching is exact-name and
/// case-sensitive per the upstream spreadsheet convention — headers are not
/// normalized for casing or whitespace, so `bufferqty` or `BufferQty ` do
/// not satisfy `BufferQty`. This strictness is a contract, not a bug.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "SKU",
    "LastCountDate",
    "LastCount",
    "TotalContainerQty",
    "ContainerDetails",
    "Final Expected Count",
    "Kenneth's Inventory",
    "StockStatus",
    "InventoryRemark",
    "Description",
    "Category",
    "BufferQty",
];

/// Verifies the required column set is a subset of the headers present.
/// Collects every absent column before failing so the caller can fix the
/// file in one pass.
pub fn validate_headers(headers: &[String]) -> Result<(), IngestError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumns(missing))
    }
}
