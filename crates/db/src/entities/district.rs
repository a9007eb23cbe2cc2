//! District reference entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// District model. Static reference data.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "district")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::upazila::Entity")]
    Upazilas,
}

impl Related<super::upazila::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upazilas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
