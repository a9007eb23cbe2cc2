//! Create users table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Users::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(Users::BloodGroup).string_len(8).not_null())
                    .col(ColumnDef::new(Users::District).string_len(128).not_null())
                    .col(ColumnDef::new(Users::Upazila).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(32)
                            .not_null()
                            .default("donor"),
                    )
                    .col(
                        ColumnDef::new(Users::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email (the account key)
        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: donor directory search tuple
        manager
            .create_index(
                Index::create()
                    .name("idx_users_blood_group_district_upazila")
                    .table(Users::Table)
                    .col(Users::BloodGroup)
                    .col(Users::District)
                    .col(Users::Upazila)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    AvatarUrl,
    BloodGroup,
    District,
    Upazila,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}
