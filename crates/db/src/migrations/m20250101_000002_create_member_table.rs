//! Create member table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_hierarchy_tables::{Cell, Generation, Network};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Member::CellId).integer())
                    .col(ColumnDef::new(Member::NetworkId).integer())
                    .col(ColumnDef::new(Member::GenerationId).integer())
                    .col(ColumnDef::new(Member::Phone).string_len(20))
                    .col(ColumnDef::new(Member::BirthDate).date())
                    .col(ColumnDef::new(Member::Address).string_len(200))
                    .col(ColumnDef::new(Member::Number).string_len(20))
                    .col(ColumnDef::new(Member::District).string_len(100))
                    .col(ColumnDef::new(Member::City).string_len(100))
                    .col(ColumnDef::new(Member::State).string_len(2))
                    .col(ColumnDef::new(Member::ZipCode).string_len(10))
                    .col(
                        ColumnDef::new(Member::Role)
                            .string_len(20)
                            .not_null()
                            .default("Membro"),
                    )
                    .col(ColumnDef::new(Member::ConversionDate).date())
                    .col(ColumnDef::new(Member::Email).string_len(100))
                    .col(ColumnDef::new(Member::PasswordHash).string_len(255))
                    .col(ColumnDef::new(Member::Token).string_len(64))
                    .col(
                        ColumnDef::new(Member::AttendedEncounter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Member::Bio).string_len(500))
                    .col(ColumnDef::new(Member::PhotoUrl).string_len(512))
                    .col(
                        ColumnDef::new(Member::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_cell")
                            .from(Member::Table, Member::CellId)
                            .to(Cell::Table, Cell::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_network")
                            .from(Member::Table, Member::NetworkId)
                            .to(Network::Table, Network::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_generation")
                            .from(Member::Table, Member::GenerationId)
                            .to(Generation::Table, Generation::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email (NULLs allowed for members without login)
        manager
            .create_index(
                Index::create()
                    .name("idx_member_email")
                    .table(Member::Table)
                    .col(Member::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_token")
                    .table(Member::Table)
                    .col(Member::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_cell_id")
                    .table(Member::Table)
                    .col(Member::CellId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Member {
    Table,
    Id,
    Name,
    CellId,
    NetworkId,
    GenerationId,
    Phone,
    BirthDate,
    Address,
    Number,
    District,
    City,
    State,
    ZipCode,
    Role,
    ConversionDate,
    Email,
    PasswordHash,
    Token,
    AttendedEncounter,
    Bio,
    PhotoUrl,
    CreatedAt,
}
