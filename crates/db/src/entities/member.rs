//! Member entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member roles.
///
/// Stored and sent with the Portuguese labels the web client understands.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "Membro")]
    #[serde(rename = "Membro")]
    Member,
    #[sea_orm(string_value = "Lider")]
    #[serde(rename = "Lider")]
    Leader,
    #[sea_orm(string_value = "LiderRede")]
    #[serde(rename = "LiderRede")]
    NetworkLeader,
    #[sea_orm(string_value = "LiderGeracao")]
    #[serde(rename = "LiderGeracao")]
    GenerationLeader,
    #[sea_orm(string_value = "Admin")]
    #[serde(rename = "Admin")]
    Admin,
    #[sea_orm(string_value = "Visitante")]
    #[serde(rename = "Visitante")]
    Visitor,
}

impl Role {
    /// Leader-type roles may post announcements and manage cells.
    #[must_use]
    pub const fn is_leader(self) -> bool {
        matches!(
            self,
            Self::Leader | Self::NetworkLeader | Self::GenerationLeader | Self::Admin
        )
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire label, e.g. `LiderRede`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "Membro",
            Self::Leader => "Lider",
            Self::NetworkLeader => "LiderRede",
            Self::GenerationLeader => "LiderGeracao",
            Self::Admin => "Admin",
            Self::Visitor => "Visitante",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(nullable, indexed)]
    pub cell_id: Option<i32>,

    /// Set for network leaders
    #[sea_orm(nullable, indexed)]
    pub network_id: Option<i32>,

    /// Set for generation leaders
    #[sea_orm(nullable, indexed)]
    pub generation_id: Option<i32>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub birth_date: Option<Date>,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub number: Option<String>,

    #[sea_orm(nullable)]
    pub district: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    #[sea_orm(nullable)]
    pub zip_code: Option<String>,

    pub role: Role,

    #[sea_orm(nullable)]
    pub conversion_date: Option<Date>,

    #[sea_orm(nullable, unique)]
    pub email: Option<String>,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    /// Opaque session token
    #[serde(skip_serializing)]
    #[sea_orm(nullable, unique)]
    pub token: Option<String>,

    /// "Encontro com Deus" retreat attended
    pub attended_encounter: bool,

    #[sea_orm(nullable)]
    pub bio: Option<String>,

    #[sea_orm(nullable)]
    pub photo_url: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cell::Entity",
        from = "Column::CellId",
        to = "super::cell::Column::Id"
    )]
    Cell,
}

impl Related<super::cell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cell.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
