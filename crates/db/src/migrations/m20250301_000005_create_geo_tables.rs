//! Create district and upazila reference tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(District::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(District::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(District::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_district_name")
                    .table(District::Table)
                    .col(District::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Upazila::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Upazila::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Upazila::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Upazila::DistrictId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upazila_district")
                            .from(Upazila::Table, Upazila::DistrictId)
                            .to(District::Table, District::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upazila_district_id")
                    .table(Upazila::Table)
                    .col(Upazila::DistrictId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Upazila::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(District::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum District {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Upazila {
    Table,
    Id,
    Name,
    DistrictId,
}
