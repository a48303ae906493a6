use sea_orm_migration::prelude::*;

use crate::m20240601_000002_create_item_table::Item;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only movement log; balances are derived from it on read.
        manager
            .create_table(
                Table::create()
                    .table(StockLedger::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockLedger::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockLedger::ItemId).integer().not_null())
                    .col(ColumnDef::new(StockLedger::Date).date().not_null())
                    .col(ColumnDef::new(StockLedger::Type).string_len(20).not_null())
                    .col(ColumnDef::new(StockLedger::Quantity).double().not_null())
                    .col(ColumnDef::new(StockLedger::Remarks).string_len(200).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_ledger_item_id")
                            .from(StockLedger::Table, StockLedger::ItemId)
                            .to(Item::Table, Item::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stock_ledger_item_id")
                    .table(StockLedger::Table)
                    .col(StockLedger::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stock_ledger_type")
                    .table(StockLedger::Table)
                    .col(StockLedger::Type)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockLedger::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StockLedger {
    Table,
    Id,
    ItemId,
    Date,
    Type,
    Quantity,
    Remarks,
}
