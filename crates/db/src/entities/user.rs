//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user. No hierarchy beyond the explicit policy table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum UserRole {
    #[sea_orm(string_value = "donor")]
    #[default]
    Donor,
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Account status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    #[sea_orm(string_value = "blocked")]
    Blocked,
}

/// User model. Created by upsert on first sign-in, never hard-deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Unique account key. Always stored lowercase.
    #[sea_orm(unique)]
    pub email: String,

    /// Display name.
    pub name: String,

    /// Avatar URL.
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Blood group, e.g. "A+", "O-".
    pub blood_group: String,

    /// Administrative district.
    pub district: String,

    /// Administrative upazila.
    pub upazila: String,

    /// Role, admin-mutable only.
    pub role: UserRole,

    /// Account status, admin-mutable only.
    pub status: UserStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
