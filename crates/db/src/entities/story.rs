//! Story entity. Stories are visible for 24 hours after creation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "story")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub photo_url: String,

    #[sea_orm(nullable)]
    pub caption: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,

    #[sea_orm(nullable, indexed)]
    pub author_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub cell_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub network_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub generation_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::AuthorId",
        to = "super::member::Column::Id"
    )]
    Author,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
