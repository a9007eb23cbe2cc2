//! Create fund table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fund::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fund::Id).string_len(32).not_null().primary_key())
                    .col(
                        ColumnDef::new(Fund::ContributorName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Fund::ContributorEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Fund::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Fund::Currency)
                            .string_len(8)
                            .not_null()
                            .default("usd"),
                    )
                    .col(
                        ColumnDef::new(Fund::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fund_created_at")
                    .table(Fund::Table)
                    .col(Fund::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fund::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Fund {
    Table,
    Id,
    ContributorName,
    ContributorEmail,
    AmountMinor,
    Currency,
    CreatedAt,
}
