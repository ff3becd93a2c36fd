mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use stockcheck_api::{
    entities::{
        inventory_record::{Column as RecordColumn, Entity as InventoryRecord},
        snapshot::Entity as Snapshot,
    },
    errors::{IngestError, ServiceError},
    ingest::CellValue,
};

use common::{date, sheet_headers, sheet_row, TestApp};

#[tokio::test]
async fn blank_sku_rows_are_skipped_and_excluded_from_record_count() {
    let app = TestApp::new().await;

    let mut blank = sheet_row("ignored", 5, 0, 1, "Active");
    blank[0] = CellValue::Text("   ".to_string());
    let mut absent = sheet_row("ignored", 5, 0, 1, "Active");
    absent[0] = CellValue::Absent;

    let rows = vec![
        sheet_row("SKU-001", 10, 0, 2, "Active"),
        blank,
        sheet_row("SKU-002", 3, 5, 2, "Active"),
        absent,
    ];

    let outcome = app
        .ingest(date(2024, 3, 15), "CheckStockTempFile_03-15-24.xlsx", rows)
        .await;

    assert_eq!(outcome.record_count, 2);

    let stored = Snapshot::find_by_id(outcome.snapshot_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.record_count, 2);

    let persisted = InventoryRecord::find()
        .filter(RecordColumn::SnapshotId.eq(outcome.snapshot_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(persisted, 2);
}

#[tokio::test]
async fn missing_columns_abort_before_anything_is_visible() {
    let app = TestApp::new().await;

    let mut headers = sheet_headers();
    headers.retain(|h| h != "BufferQty");

    let result = app
        .state
        .ingestor
        .ingest_sheet(
            date(2024, 3, 15),
            headers,
            vec![sheet_row("SKU-001", 10, 0, 2, "Active")],
            "CheckStockTempFile_03-15-24.xlsx",
            1024,
            "tester",
        )
        .await;

    match result {
        Err(ServiceError::Ingest(IngestError::MissingColumns(missing))) => {
            assert_eq!(missing, vec!["BufferQty".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }

    let snapshots = Snapshot::find().count(&*app.state.db).await.unwrap();
    assert_eq!(snapshots, 0);
    let records = InventoryRecord::find().count(&*app.state.db).await.unwrap();
    assert_eq!(records, 0);
}

#[tokio::test]
async fn large_sheets_flush_in_batches_without_losing_rows() {
    let app = TestApp::new().await;

    // One full batch plus a partial remainder.
    let rows: Vec<_> = (0..502)
        .map(|i| sheet_row(&format!("SKU-{i:04}"), i, 0, 5, "Active"))
        .collect();

    let outcome = app
        .ingest(date(2024, 3, 16), "CheckStockTempFile_03-16-24.xlsx", rows)
        .await;

    assert_eq!(outcome.record_count, 502);
    let persisted = InventoryRecord::find()
        .filter(RecordColumn::SnapshotId.eq(outcome.snapshot_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(persisted, 502);
}

#[tokio::test]
async fn deleting_a_snapshot_leaves_other_snapshots_untouched() {
    let app = TestApp::new().await;

    let first = app
        .ingest(
            date(2024, 3, 15),
            "CheckStockTempFile_03-15-24.xlsx",
            vec![
                sheet_row("SKU-001", 10, 0, 2, "Active"),
                sheet_row("SKU-002", 3, 5, 2, "Active"),
            ],
        )
        .await;
    let second = app
        .ingest(
            date(2024, 3, 16),
            "CheckStockTempFile_03-16-24.xlsx",
            vec![sheet_row("SKU-001", 8, 0, 2, "Active")],
        )
        .await;

    let deleted = app.state.snapshots.delete(first.snapshot_id).await.unwrap();
    assert_eq!(deleted.record_count, 2);

    assert!(Snapshot::find_by_id(first.snapshot_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .is_none());
    let orphans = InventoryRecord::find()
        .filter(RecordColumn::SnapshotId.eq(first.snapshot_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    let survivors = InventoryRecord::find()
        .filter(RecordColumn::SnapshotId.eq(second.snapshot_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(survivors, 1);
}

#[tokio::test]
async fn deleting_a_missing_snapshot_is_not_found() {
    let app = TestApp::new().await;
    let result = app.state.snapshots.delete(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn upload_rejects_wrong_extension() {
    let app = TestApp::new().await;
    let (status, body) = app.upload("CheckStockTempFile_03-15-24.csv", b"a,b,c").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid input: Invalid file type. Please upload .xlsx or .xls files."
    );
}

#[tokio::test]
async fn upload_rejects_bad_filename_before_reading_the_workbook() {
    let app = TestApp::new().await;
    // Garbage bytes never matter: the filename fails first.
    let (status, body) = app.upload("StockFile_2024-03-15.xlsx", b"not a workbook").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("invalid filename format"));
}

#[tokio::test]
async fn upload_rejects_unreadable_workbook_bytes() {
    let app = TestApp::new().await;
    let (status, body) = app
        .upload("CheckStockTempFile_03-15-24.xlsx", b"definitely not xlsx")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("could not read workbook"));
}
