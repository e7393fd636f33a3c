//! Create prayer request, testimony, meeting and attendance tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_hierarchy_tables::Cell;
use super::m20250101_000002_create_member_table::Member;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PrayerRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrayerRequest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrayerRequest::CellId).integer().not_null())
                    .col(ColumnDef::new(PrayerRequest::MemberId).integer().not_null())
                    .col(ColumnDef::new(PrayerRequest::Text).text().not_null())
                    .col(
                        ColumnDef::new(PrayerRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PrayerRequest::Resolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prayer_request_cell")
                            .from(PrayerRequest::Table, PrayerRequest::CellId)
                            .to(Cell::Table, Cell::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prayer_request_member")
                            .from(PrayerRequest::Table, PrayerRequest::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prayer_request_cell_id")
                    .table(PrayerRequest::Table)
                    .col(PrayerRequest::CellId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Testimony::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Testimony::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Testimony::CellId).integer().not_null())
                    .col(ColumnDef::new(Testimony::MemberId).integer().not_null())
                    .col(ColumnDef::new(Testimony::Text).text().not_null())
                    .col(
                        ColumnDef::new(Testimony::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_testimony_cell")
                            .from(Testimony::Table, Testimony::CellId)
                            .to(Cell::Table, Cell::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_testimony_member")
                            .from(Testimony::Table, Testimony::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_testimony_cell_id")
                    .table(Testimony::Table)
                    .col(Testimony::CellId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meeting::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meeting::CellId).integer().not_null())
                    .col(ColumnDef::new(Meeting::HeldAt).date_time().not_null())
                    .col(ColumnDef::new(Meeting::Topic).string_len(100))
                    .col(ColumnDef::new(Meeting::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_cell")
                            .from(Meeting::Table, Meeting::CellId)
                            .to(Cell::Table, Cell::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (cell_id, held_at) for "most recent meetings of a cell"
        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_cell_held_at")
                    .table(Meeting::Table)
                    .col(Meeting::CellId)
                    .col(Meeting::HeldAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::MeetingId).integer().not_null())
                    .col(ColumnDef::new(Attendance::MemberId).integer().not_null())
                    .col(
                        ColumnDef::new(Attendance::Present)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_meeting")
                            .from(Attendance::Table, Attendance::MeetingId)
                            .to(Meeting::Table, Meeting::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_member")
                            .from(Attendance::Table, Attendance::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (meeting_id, member_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_meeting_member")
                    .table(Attendance::Table)
                    .col(Attendance::MeetingId)
                    .col(Attendance::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meeting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Testimony::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PrayerRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PrayerRequest {
    Table,
    Id,
    CellId,
    MemberId,
    Text,
    CreatedAt,
    Resolved,
}

#[derive(Iden)]
enum Testimony {
    Table,
    Id,
    CellId,
    MemberId,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum Meeting {
    Table,
    Id,
    CellId,
    HeldAt,
    Topic,
    Notes,
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    MeetingId,
    MemberId,
    Present,
}
