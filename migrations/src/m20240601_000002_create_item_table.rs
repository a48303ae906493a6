use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_category_table::Category;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Item::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Item::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Item::Size).string_len(50).null())
                    .col(ColumnDef::new(Item::Description).string_len(200).null())
                    .col(ColumnDef::new(Item::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Item::Unit).string_len(20).null())
                    .col(ColumnDef::new(Item::MinLevel).double().null())
                    .col(ColumnDef::new(Item::RackNo).string_len(20).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_category_id")
                            .from(Item::Table, Item::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_item_category_id")
                    .table(Item::Table)
                    .col(Item::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Item::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Item {
    Table,
    Id,
    Name,
    Size,
    Description,
    CategoryId,
    Unit,
    MinLevel,
    RackNo,
}
