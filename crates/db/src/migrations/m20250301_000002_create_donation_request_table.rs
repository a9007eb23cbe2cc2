//! Create donation request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DonationRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DonationRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RequesterEmail)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RequesterName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RecipientName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RecipientDistrict)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RecipientUpazila)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::HospitalName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::FullAddress)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::BloodGroup)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::DonationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::DonationTime)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::RequestMessage)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationRequest::DonationStatus)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DonationRequest::DonorName).string_len(256))
                    .col(ColumnDef::new(DonationRequest::DonorEmail).string_len(256))
                    .col(
                        ColumnDef::new(DonationRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DonationRequest::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: owner listing
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_request_requester_email")
                    .table(DonationRequest::Table)
                    .col(DonationRequest::RequesterEmail)
                    .to_owned(),
            )
            .await?;

        // Index: status filters (public pending view, admin listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_request_status")
                    .table(DonationRequest::Table)
                    .col(DonationRequest::DonationStatus)
                    .to_owned(),
            )
            .await?;

        // Index: rolling-window recent view
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_request_donation_date")
                    .table(DonationRequest::Table)
                    .col(DonationRequest::DonationDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DonationRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DonationRequest {
    Table,
    Id,
    RequesterEmail,
    RequesterName,
    RecipientName,
    RecipientDistrict,
    RecipientUpazila,
    HospitalName,
    FullAddress,
    BloodGroup,
    DonationDate,
    DonationTime,
    RequestMessage,
    DonationStatus,
    DonorName,
    DonorEmail,
    CreatedAt,
    UpdatedAt,
}
