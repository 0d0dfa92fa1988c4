use sea_orm_migration::prelude::*;

/// Embedded schema migrator. A fresh store gets the full ledger schema
/// plus the bootstrap ADMIN user, so it is always accessible.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240101_000002_create_ledger_tables::Migration),
            Box::new(m20240101_000003_create_users_table::Migration),
        ]
    }
}

mod m20240101_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Code).string().not_null())
                        .col(ColumnDef::new(Products::Description).string().not_null())
                        .col(ColumnDef::new(Products::Unit).string().not_null())
                        .col(ColumnDef::new(Products::Price).decimal().not_null())
                        .col(ColumnDef::new(Products::MaxQty).decimal().not_null())
                        .col(ColumnDef::new(Products::MinQty).decimal().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_code")
                        .table(Products::Table)
                        .col(Products::Code)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CostCenters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CostCenters::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CostCenters::Code).string().not_null())
                        .col(ColumnDef::new(CostCenters::Description).string().not_null())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CostCenters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Code,
        Description,
        Unit,
        Price,
        MaxQty,
        MinQty,
    }

    #[derive(DeriveIden)]
    pub(super) enum CostCenters {
        Table,
        Id,
        Code,
        Description,
    }
}

mod m20240101_000002_create_ledger_tables {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_catalog_tables::{CostCenters, Products};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_ledger_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(IncomingHeaders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IncomingHeaders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(IncomingHeaders::Date).date().not_null())
                        .col(ColumnDef::new(IncomingHeaders::DnNumber).string().not_null())
                        .col(ColumnDef::new(IncomingHeaders::Supplier).string().not_null())
                        .col(ColumnDef::new(IncomingHeaders::Remarks).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(IncomingLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IncomingLines::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(IncomingLines::IncomingId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IncomingLines::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(IncomingLines::Quantity).decimal().not_null())
                        .col(ColumnDef::new(IncomingLines::Price).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_incoming_lines_header")
                                .from(IncomingLines::Table, IncomingLines::IncomingId)
                                .to(IncomingHeaders::Table, IncomingHeaders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_incoming_lines_product")
                                .from(IncomingLines::Table, IncomingLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OutgoingHeaders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OutgoingHeaders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OutgoingHeaders::Date).date().not_null())
                        .col(
                            ColumnDef::new(OutgoingHeaders::CostCenterId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OutgoingHeaders::Remarks).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_outgoing_headers_cost_center")
                                .from(OutgoingHeaders::Table, OutgoingHeaders::CostCenterId)
                                .to(CostCenters::Table, CostCenters::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OutgoingLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OutgoingLines::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OutgoingLines::OutgoingId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingLines::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OutgoingLines::Quantity).decimal().not_null())
                        .col(ColumnDef::new(OutgoingLines::Price).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_outgoing_lines_header")
                                .from(OutgoingLines::Table, OutgoingLines::OutgoingId)
                                .to(OutgoingHeaders::Table, OutgoingHeaders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_outgoing_lines_product")
                                .from(OutgoingLines::Table, OutgoingLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AdjustmentHeaders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AdjustmentHeaders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AdjustmentHeaders::Date).date().not_null())
                        .col(ColumnDef::new(AdjustmentHeaders::Remarks).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AdjustmentLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AdjustmentLines::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(AdjustmentLines::AdjustmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AdjustmentLines::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AdjustmentLines::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AdjustmentLines::Price).decimal().not_null())
                        .col(ColumnDef::new(AdjustmentLines::Kind).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_adjustment_lines_header")
                                .from(AdjustmentLines::Table, AdjustmentLines::AdjustmentId)
                                .to(AdjustmentHeaders::Table, AdjustmentHeaders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_adjustment_lines_product")
                                .from(AdjustmentLines::Table, AdjustmentLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_incoming_lines_product")
                        .table(IncomingLines::Table)
                        .col(IncomingLines::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_outgoing_lines_product")
                        .table(OutgoingLines::Table)
                        .col(OutgoingLines::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_adjustment_lines_product")
                        .table(AdjustmentLines::Table)
                        .col(AdjustmentLines::ProductId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                Table::drop().table(AdjustmentLines::Table).to_owned(),
                Table::drop().table(AdjustmentHeaders::Table).to_owned(),
                Table::drop().table(OutgoingLines::Table).to_owned(),
                Table::drop().table(OutgoingHeaders::Table).to_owned(),
                Table::drop().table(IncomingLines::Table).to_owned(),
                Table::drop().table(IncomingHeaders::Table).to_owned(),
            ] {
                manager.drop_table(table).await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum IncomingHeaders {
        Table,
        Id,
        Date,
        DnNumber,
        Supplier,
        Remarks,
    }

    #[derive(DeriveIden)]
    enum IncomingLines {
        Table,
        Id,
        IncomingId,
        ProductId,
        Quantity,
        Price,
    }

    #[derive(DeriveIden)]
    enum OutgoingHeaders {
        Table,
        Id,
        Date,
        CostCenterId,
        Remarks,
    }

    #[derive(DeriveIden)]
    enum OutgoingLines {
        Table,
        Id,
        OutgoingId,
        ProductId,
        Quantity,
        Price,
    }

    #[derive(DeriveIden)]
    enum AdjustmentHeaders {
        Table,
        Id,
        Date,
        Remarks,
    }

    #[derive(DeriveIden)]
    enum AdjustmentLines {
        Table,
        Id,
        AdjustmentId,
        ProductId,
        Quantity,
        Price,
        Kind,
    }
}

mod m20240101_000003_create_users_table {

    use sea_orm_migration::prelude::*;

    use crate::services::access;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordDigest).text().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .to_owned(),
                )
                .await?;

            // Bootstrap account so a freshly created store is accessible.
            let seed = Query::insert()
                .into_table(Users::Table)
                .columns([Users::Username, Users::PasswordDigest, Users::Role])
                .values_panic([
                    access::BOOTSTRAP_USERNAME.into(),
                    access::digest(access::BOOTSTRAP_SECRET).into(),
                    "ADMIN".into(),
                ])
                .to_owned();
            manager.exec_stmt(seed).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordDigest,
        Role,
    }
}
