//! Fund entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fund model. Append-only: aggregated but never mutated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fund")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Contributor display name.
    pub contributor_name: String,

    /// Contributor email.
    pub contributor_email: String,

    /// Amount in minor currency units (e.g. cents).
    pub amount_minor: i64,

    /// ISO 4217 currency code.
    pub currency: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
