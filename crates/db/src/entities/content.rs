//! Blog content entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication status of a blog post.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ContentStatus {
    #[sea_orm(string_value = "draft")]
    #[default]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

/// Blog content model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(nullable)]
    pub thumbnail_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub status: ContentStatus,

    /// Email of the author.
    pub author_email: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
