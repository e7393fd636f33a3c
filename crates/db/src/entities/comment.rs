//! Comment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A comment on an event or an announcement, optionally a reply.
///
/// Exactly one of `event_id` / `announcement_id` is set. Replies carry the
/// same target as their parent.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable, indexed)]
    pub event_id: Option<i32>,

    #[sea_orm(nullable, indexed)]
    pub announcement_id: Option<i32>,

    #[sea_orm(indexed)]
    pub member_id: i32,

    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
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
