use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_snapshots_table::Migration),
            Box::new(m20240101_000002_create_inventory_records_table::Migration),
            Box::new(m20240101_000003_create_print_requests_table::Migration),
            Box::new(m20240101_000004_create_settings_table::Migration),
        ]
    }
}

mod m20240101_000001_create_snapshots_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_snapshots_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Snapshots::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Snapshots::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Snapshots::Filename).string().not_null())
                        .col(ColumnDef::new(Snapshots::SnapshotDate).date().not_null())
                        .col(
                            ColumnDef::new(Snapshots::RecordCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Snapshots::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Snapshots::UploadedBy).string().not_null())
                        .col(
                            ColumnDef::new(Snapshots::FileSize)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            // No uniqueness on the date: several snapshots per day are legal
            // and current-file selection orders by date then upload time.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_snapshots_date")
                        .table(Snapshots::Table)
                        .col(Snapshots::SnapshotDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Snapshots::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Snapshots {
        Table,
        Id,
        Filename,
        SnapshotDate,
        RecordCount,
        UploadedAt,
        UploadedBy,
        FileSize,
    }
}

mod m20240101_000002_create_inventory_records_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_snapshots_table::Snapshots;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_inventory_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryRecords::SnapshotId).uuid().not_null())
                        .col(ColumnDef::new(InventoryRecords::Sku).string().not_null())
                        .col(
                            ColumnDef::new(InventoryRecords::Description)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::Category)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(InventoryRecords::LastCountDate).date().null())
                        .col(
                            ColumnDef::new(InventoryRecords::LastCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::TotalContainerQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::ContainerDetails)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::FinalExpectedCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::OnHandQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::BufferQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::StockStatus)
                                .string()
                                .not_null()
                                .default("Unknown"),
                        )
                        .col(ColumnDef::new(InventoryRecords::Remark).text().not_null())
                        .col(
                            ColumnDef::new(InventoryRecords::SnapshotDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_records_snapshot")
                                .from(InventoryRecords::Table, InventoryRecords::SnapshotId)
                                .to(Snapshots::Table, Snapshots::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_records_snapshot_id")
                        .table(InventoryRecords::Table)
                        .col(InventoryRecords::SnapshotId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_records_sku")
                        .table(InventoryRecords::Table)
                        .col(InventoryRecords::Sku)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryRecords::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum InventoryRecords {
        Table,
        Id,
        SnapshotId,
        Sku,
        Description,
        Category,
        LastCountDate,
        LastCount,
        TotalContainerQty,
        ContainerDetails,
        FinalExpectedCount,
        OnHandQty,
        BufferQty,
        StockStatus,
        Remark,
        SnapshotDate,
        CreatedAt,
    }
}

mod m20240101_000003_create_print_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_print_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PrintRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PrintRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrintRequests::RequestId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PrintRequests::RequestedBy).string().not_null())
                        .col(
                            ColumnDef::new(PrintRequests::RequestedById)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrintRequests::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PrintRequests::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(PrintRequests::SkuList).text().not_null())
                        .col(ColumnDef::new(PrintRequests::SkuCount).integer().not_null())
                        .col(ColumnDef::new(PrintRequests::Notes).text().null())
                        .col(ColumnDef::new(PrintRequests::SourceType).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PrintRequests::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum PrintRequests {
        Table,
        Id,
        RequestId,
        RequestedBy,
        RequestedById,
        RequestedAt,
        Status,
        SkuList,
        SkuCount,
        Notes,
        SourceType,
    }
}

mod m20240101_000004_create_settings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_settings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Settings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Settings::Id).integer().primary_key().not_null())
                        .col(ColumnDef::new(Settings::SystemName).string().not_null())
                        .col(ColumnDef::new(Settings::LogoPath).string().not_null())
                        .col(ColumnDef::new(Settings::PrimaryColor).string().not_null())
                        .col(ColumnDef::new(Settings::SuccessColor).string().not_null())
                        .col(ColumnDef::new(Settings::WarningColor).string().not_null())
                        .col(ColumnDef::new(Settings::DangerColor).string().not_null())
                        .col(
                            ColumnDef::new(Settings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Settings::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Settings {
        Table,
        Id,
        SystemName,
        LogoPath,
        PrimaryColor,
        SuccessColor,
        WarningColor,
        DangerColor,
        UpdatedAt,
    }
}
