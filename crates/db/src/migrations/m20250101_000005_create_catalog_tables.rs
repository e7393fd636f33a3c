//! Create school and study tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(School::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(School::Name).string_len(100).not_null())
                    .col(ColumnDef::new(School::Description).text())
                    .col(ColumnDef::new(School::PhotoUrl).string_len(512))
                    .col(ColumnDef::new(School::Schedule).string_len(100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Study::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Study::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Study::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Study::ContentLink).string_len(512))
                    .col(
                        ColumnDef::new(Study::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Study::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum School {
    Table,
    Id,
    Name,
    Description,
    PhotoUrl,
    Schedule,
}

#[derive(Iden)]
enum Study {
    Table,
    Id,
    Title,
    ContentLink,
    PublishedAt,
}
