//! Create content table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Content::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Content::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Content::ThumbnailUrl).string_len(1024))
                    .col(ColumnDef::new(Content::Body).text().not_null())
                    .col(
                        ColumnDef::new(Content::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Content::AuthorEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Content::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Content::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_status")
                    .table(Content::Table)
                    .col(Content::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Content {
    Table,
    Id,
    Title,
    ThumbnailUrl,
    Body,
    Status,
    AuthorEmail,
    CreatedAt,
    UpdatedAt,
}
