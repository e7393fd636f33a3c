//! Create network, generation and cell tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Network::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Network::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Network::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Network::LeaderName).string_len(100))
                    .col(ColumnDef::new(Network::LeaderPhone).string_len(20))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Generation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Generation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Generation::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Generation::NetworkId).integer())
                    .col(ColumnDef::new(Generation::LeaderName).string_len(100))
                    .col(ColumnDef::new(Generation::LeaderPhone).string_len(20))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generation_network")
                            .from(Generation::Table, Generation::NetworkId)
                            .to(Network::Table, Network::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generation_network_id")
                    .table(Generation::Table)
                    .col(Generation::NetworkId)
                    .to_owned(),
            )
            .await?;

        // `network_label` is the legacy free-text network name, resolved into
        // `network_id` and dropped by the backfill migration.
        manager
            .create_table(
                Table::create()
                    .table(Cell::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cell::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cell::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Cell::Leader).string_len(100))
                    .col(ColumnDef::new(Cell::TraineeLeader).string_len(100))
                    .col(ColumnDef::new(Cell::NetworkId).integer())
                    .col(ColumnDef::new(Cell::GenerationId).integer())
                    .col(ColumnDef::new(Cell::NetworkLabel).string_len(100))
                    .col(ColumnDef::new(Cell::Address).string_len(200))
                    .col(ColumnDef::new(Cell::Number).string_len(20))
                    .col(ColumnDef::new(Cell::District).string_len(100))
                    .col(ColumnDef::new(Cell::City).string_len(100))
                    .col(ColumnDef::new(Cell::State).string_len(2))
                    .col(ColumnDef::new(Cell::ZipCode).string_len(10))
                    .col(ColumnDef::new(Cell::Latitude).double())
                    .col(ColumnDef::new(Cell::Longitude).double())
                    .col(ColumnDef::new(Cell::MeetingDay).string_len(50))
                    .col(ColumnDef::new(Cell::MeetingTime).string_len(50))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cell_network")
                            .from(Cell::Table, Cell::NetworkId)
                            .to(Network::Table, Network::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cell_generation")
                            .from(Cell::Table, Cell::GenerationId)
                            .to(Generation::Table, Generation::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cell_network_id")
                    .table(Cell::Table)
                    .col(Cell::NetworkId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cell_generation_id")
                    .table(Cell::Table)
                    .col(Cell::GenerationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cell::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Generation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Network::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Network {
    Table,
    Id,
    Name,
    LeaderName,
    LeaderPhone,
}

#[derive(Iden)]
pub enum Generation {
    Table,
    Id,
    Name,
    NetworkId,
    LeaderName,
    LeaderPhone,
}

#[derive(Iden)]
pub enum Cell {
    Table,
    Id,
    Name,
    Leader,
    TraineeLeader,
    NetworkId,
    GenerationId,
    NetworkLabel,
    Address,
    Number,
    District,
    City,
    State,
    ZipCode,
    Latitude,
    Longitude,
    MeetingDay,
    MeetingTime,
}
