//! Announcement entity.
//!
//! An announcement is scoped to any combination of cell, generation and
//! network; readers match it if any of the three applies to them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(nullable, indexed)]
    pub cell_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub network_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub generation_id: Option<i32>,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub created_at: DateTimeUtc,

    /// Author member ID (leader role)
    #[sea_orm(indexed)]
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::AuthorId",
        to = "super::member::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
