//! Create event, announcement, comment, like and story tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_member_table::Member;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Event::Description).text())
                    .col(ColumnDef::new(Event::StartsAt).date_time())
                    .col(ColumnDef::new(Event::Location).string_len(200))
                    .col(ColumnDef::new(Event::PhotoUrl).string_len(512))
                    .to_owned(),
            )
            .await?;

        // Scope columns are OR-matched tags and carry no foreign keys;
        // hierarchy deletes clear them explicitly.
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcement::CellId).integer())
                    .col(ColumnDef::new(Announcement::NetworkId).integer())
                    .col(ColumnDef::new(Announcement::GenerationId).integer())
                    .col(ColumnDef::new(Announcement::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Announcement::Message).text().not_null())
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::AuthorId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_author")
                            .from(Announcement::Table, Announcement::AuthorId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_announcement_cell_id", Announcement::CellId),
            ("idx_announcement_network_id", Announcement::NetworkId),
            ("idx_announcement_generation_id", Announcement::GenerationId),
            ("idx_announcement_author_id", Announcement::AuthorId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Announcement::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comment::Text).text().not_null())
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Comment::EventId).integer())
                    .col(ColumnDef::new(Comment::AnnouncementId).integer())
                    .col(ColumnDef::new(Comment::MemberId).integer().not_null())
                    .col(ColumnDef::new(Comment::ParentId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_event")
                            .from(Comment::Table, Comment::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_announcement")
                            .from(Comment::Table, Comment::AnnouncementId)
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_member")
                            .from(Comment::Table, Comment::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_parent")
                            .from(Comment::Table, Comment::ParentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_comment_event_id", Comment::EventId),
            ("idx_comment_announcement_id", Comment::AnnouncementId),
            ("idx_comment_member_id", Comment::MemberId),
            ("idx_comment_parent_id", Comment::ParentId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Comment::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(PostLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostLike::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostLike::EventId).integer())
                    .col(ColumnDef::new(PostLike::AnnouncementId).integer())
                    .col(ColumnDef::new(PostLike::MemberId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_event")
                            .from(PostLike::Table, PostLike::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_announcement")
                            .from(PostLike::Table, PostLike::AnnouncementId)
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_member")
                            .from(PostLike::Table, PostLike::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique indexes: one like per (target, member). Rows for the other
        // target kind carry NULL, which never collides.
        manager
            .create_index(
                Index::create()
                    .name("idx_post_like_event_member")
                    .table(PostLike::Table)
                    .col(PostLike::EventId)
                    .col(PostLike::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_like_announcement_member")
                    .table(PostLike::Table)
                    .col(PostLike::AnnouncementId)
                    .col(PostLike::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentLike::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommentLike::CommentId).integer().not_null())
                    .col(ColumnDef::new(CommentLike::MemberId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_like_comment")
                            .from(CommentLike::Table, CommentLike::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_like_member")
                            .from(CommentLike::Table, CommentLike::MemberId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_like_comment_member")
                    .table(CommentLike::Table)
                    .col(CommentLike::CommentId)
                    .col(CommentLike::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Story::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Story::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Story::PhotoUrl).string_len(512).not_null())
                    .col(ColumnDef::new(Story::Caption).string_len(100))
                    .col(
                        ColumnDef::new(Story::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Story::AuthorId).integer())
                    .col(ColumnDef::new(Story::CellId).integer())
                    .col(ColumnDef::new(Story::NetworkId).integer())
                    .col(ColumnDef::new(Story::GenerationId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_author")
                            .from(Story::Table, Story::AuthorId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_story_created_at")
                    .table(Story::Table)
                    .col(Story::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Story::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CommentLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
pub enum Event {
    Table,
    Id,
    Title,
    Description,
    StartsAt,
    Location,
    PhotoUrl,
}

#[derive(Iden, Clone, Copy)]
pub enum Announcement {
    Table,
    Id,
    CellId,
    NetworkId,
    GenerationId,
    Title,
    Message,
    CreatedAt,
    AuthorId,
}

#[derive(Iden, Clone, Copy)]
pub enum Comment {
    Table,
    Id,
    Text,
    CreatedAt,
    EventId,
    AnnouncementId,
    MemberId,
    ParentId,
}

#[derive(Iden)]
pub enum PostLike {
    Table,
    Id,
    EventId,
    AnnouncementId,
    MemberId,
}

#[derive(Iden)]
pub enum CommentLike {
    Table,
    Id,
    CommentId,
    MemberId,
}

#[derive(Iden)]
pub enum Story {
    Table,
    Id,
    PhotoUrl,
    Caption,
    CreatedAt,
    AuthorId,
    CellId,
    NetworkId,
    GenerationId,
}
