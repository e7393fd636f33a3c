//! Cascading deletes and hierarchy detaches.
//!
//! Every operation runs as one transaction that removes dependents in
//! dependency order before the row itself, so a failure leaves nothing
//! half-deleted.

use std::sync::Arc;

use crate::entities::{
    Announcement, Attendance, Cell, Comment, CommentLike, Event, Generation, Meeting, Member,
    Network, PostLike, PrayerRequest, Story, Testimony, announcement, attendance, cell, comment,
    comment_like, generation, meeting, member, post_like, prayer_request, story, testimony,
};
use celula_common::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, TransactionTrait, sea_query::Expr,
};

/// Repository for multi-table deletes.
#[derive(Clone)]
pub struct CascadeRepository {
    db: Arc<DatabaseConnection>,
}

impl CascadeRepository {
    /// Create a new cascade repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Delete a member with their likes, comments (and the replies under
    /// them), attendance, authored announcements, prayer requests,
    /// testimonies and stories.
    pub async fn delete_member(&self, member_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        PostLike::delete_many()
            .filter(post_like::Column::MemberId.eq(member_id))
            .exec(&txn)
            .await?;
        CommentLike::delete_many()
            .filter(comment_like::Column::MemberId.eq(member_id))
            .exec(&txn)
            .await?;

        let own_comments: Vec<i32> = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::MemberId.eq(member_id))
            .into_tuple()
            .all(&txn)
            .await?;
        delete_comment_trees(&txn, own_comments).await?;

        Attendance::delete_many()
            .filter(attendance::Column::MemberId.eq(member_id))
            .exec(&txn)
            .await?;

        let authored: Vec<i32> = Announcement::find()
            .select_only()
            .column(announcement::Column::Id)
            .filter(announcement::Column::AuthorId.eq(member_id))
            .into_tuple()
            .all(&txn)
            .await?;
        delete_announcements(&txn, authored).await?;

        PrayerRequest::delete_many()
            .filter(prayer_request::Column::MemberId.eq(member_id))
            .exec(&txn)
            .await?;
        Testimony::delete_many()
            .filter(testimony::Column::MemberId.eq(member_id))
            .exec(&txn)
            .await?;
        Story::delete_many()
            .filter(story::Column::AuthorId.eq(member_id))
            .exec(&txn)
            .await?;

        Member::delete_by_id(member_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(member_id, "Deleted member and dependents");
        Ok(())
    }

    /// Delete an event with its likes and comments.
    pub async fn delete_event(&self, event_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        PostLike::delete_many()
            .filter(post_like::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;

        let comments: Vec<i32> = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::EventId.eq(event_id))
            .into_tuple()
            .all(&txn)
            .await?;
        delete_comment_trees(&txn, comments).await?;

        Event::delete_by_id(event_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(event_id, "Deleted event and dependents");
        Ok(())
    }

    /// Delete an announcement with its likes and comments.
    pub async fn delete_announcement(&self, announcement_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        delete_announcements(&txn, vec![announcement_id]).await?;
        txn.commit().await?;
        tracing::info!(announcement_id, "Deleted announcement and dependents");
        Ok(())
    }

    /// Delete a comment with its reply subtree and every like on them.
    pub async fn delete_comment(&self, comment_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        delete_comment_trees(&txn, vec![comment_id]).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Delete a cell: members are detached; meetings with attendance, prayer
    /// requests, testimonies, cell-scoped announcements and stories go.
    pub async fn delete_cell(&self, cell_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        Member::update_many()
            .col_expr(member::Column::CellId, Expr::value(Option::<i32>::None))
            .filter(member::Column::CellId.eq(cell_id))
            .exec(&txn)
            .await?;

        let meetings: Vec<i32> = Meeting::find()
            .select_only()
            .column(meeting::Column::Id)
            .filter(meeting::Column::CellId.eq(cell_id))
            .into_tuple()
            .all(&txn)
            .await?;
        if !meetings.is_empty() {
            Attendance::delete_many()
                .filter(attendance::Column::MeetingId.is_in(meetings.clone()))
                .exec(&txn)
                .await?;
            Meeting::delete_many()
                .filter(meeting::Column::Id.is_in(meetings))
                .exec(&txn)
                .await?;
        }

        PrayerRequest::delete_many()
            .filter(prayer_request::Column::CellId.eq(cell_id))
            .exec(&txn)
            .await?;
        Testimony::delete_many()
            .filter(testimony::Column::CellId.eq(cell_id))
            .exec(&txn)
            .await?;

        let scoped: Vec<i32> = Announcement::find()
            .select_only()
            .column(announcement::Column::Id)
            .filter(announcement::Column::CellId.eq(cell_id))
            .into_tuple()
            .all(&txn)
            .await?;
        delete_announcements(&txn, scoped).await?;

        Story::delete_many()
            .filter(story::Column::CellId.eq(cell_id))
            .exec(&txn)
            .await?;

        Cell::delete_by_id(cell_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(cell_id, "Deleted cell and dependents");
        Ok(())
    }

    /// Delete a generation, detaching its cells, members and scoped content.
    pub async fn delete_generation(&self, generation_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let none = || Expr::value(Option::<i32>::None);

        Cell::update_many()
            .col_expr(cell::Column::GenerationId, none())
            .filter(cell::Column::GenerationId.eq(generation_id))
            .exec(&txn)
            .await?;
        Member::update_many()
            .col_expr(member::Column::GenerationId, none())
            .filter(member::Column::GenerationId.eq(generation_id))
            .exec(&txn)
            .await?;
        Announcement::update_many()
            .col_expr(announcement::Column::GenerationId, none())
            .filter(announcement::Column::GenerationId.eq(generation_id))
            .exec(&txn)
            .await?;
        Story::update_many()
            .col_expr(story::Column::GenerationId, none())
            .filter(story::Column::GenerationId.eq(generation_id))
            .exec(&txn)
            .await?;

        Generation::delete_by_id(generation_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(generation_id, "Deleted generation");
        Ok(())
    }

    /// Delete a network, detaching its generations, cells, members and
    /// scoped content.
    pub async fn delete_network(&self, network_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let none = || Expr::value(Option::<i32>::None);

        Generation::update_many()
            .col_expr(generation::Column::NetworkId, none())
            .filter(generation::Column::NetworkId.eq(network_id))
            .exec(&txn)
            .await?;
        Cell::update_many()
            .col_expr(cell::Column::NetworkId, none())
            .filter(cell::Column::NetworkId.eq(network_id))
            .exec(&txn)
            .await?;
        Member::update_many()
            .col_expr(member::Column::NetworkId, none())
            .filter(member::Column::NetworkId.eq(network_id))
            .exec(&txn)
            .await?;
        Announcement::update_many()
            .col_expr(announcement::Column::NetworkId, none())
            .filter(announcement::Column::NetworkId.eq(network_id))
            .exec(&txn)
            .await?;
        Story::update_many()
            .col_expr(story::Column::NetworkId, none())
            .filter(story::Column::NetworkId.eq(network_id))
            .exec(&txn)
            .await?;

        Network::delete_by_id(network_id).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(network_id, "Deleted network");
        Ok(())
    }
}

/// Delete announcements with their likes and comments.
async fn delete_announcements<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }

    PostLike::delete_many()
        .filter(post_like::Column::AnnouncementId.is_in(ids.clone()))
        .exec(db)
        .await?;

    let comments: Vec<i32> = Comment::find()
        .select_only()
        .column(comment::Column::Id)
        .filter(comment::Column::AnnouncementId.is_in(ids.clone()))
        .into_tuple()
        .all(db)
        .await?;
    delete_comment_trees(db, comments).await?;

    Announcement::delete_many()
        .filter(announcement::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete the given comments, every reply below them and all their likes.
async fn delete_comment_trees<C: ConnectionTrait>(db: &C, roots: Vec<i32>) -> Result<(), DbErr> {
    let ids = collect_subtree(db, roots).await?;
    if ids.is_empty() {
        return Ok(());
    }

    CommentLike::delete_many()
        .filter(comment_like::Column::CommentId.is_in(ids.clone()))
        .exec(db)
        .await?;
    Comment::delete_many()
        .filter(comment::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Breadth-first walk over `parent_id` collecting `roots` and all replies.
async fn collect_subtree<C: ConnectionTrait>(db: &C, roots: Vec<i32>) -> Result<Vec<i32>, DbErr> {
    let mut all = roots.clone();
    let mut frontier = roots;

    while !frontier.is_empty() {
        let children: Vec<i32> = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::ParentId.is_in(frontier))
            .into_tuple()
            .all(db)
            .await?;
        frontier = children
            .into_iter()
            .filter(|id| !all.contains(id))
            .collect();
        all.extend(&frontier);
    }

    Ok(all)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    async fn exec(db: &DatabaseConnection, sql: &str) {
        db.execute_unprepared(sql).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_comment_removes_reply_subtree() {
        let db = setup_test_db().await.unwrap();
        exec(
            &db,
            "INSERT INTO member (name, role, attended_encounter, created_at) VALUES \
             ('Ana', 'Membro', false, '2025-01-01T00:00:00Z')",
        )
        .await;
        exec(&db, "INSERT INTO event (title) VALUES ('Retiro')").await;
        exec(
            &db,
            "INSERT INTO comment (text, created_at, event_id, member_id, parent_id) VALUES \
             ('raiz', '2025-01-01T00:00:00Z', 1, 1, NULL), \
             ('filho', '2025-01-01T00:00:00Z', 1, 1, 1), \
             ('neto', '2025-01-01T00:00:00Z', 1, 1, 2), \
             ('outro', '2025-01-01T00:00:00Z', 1, 1, NULL)",
        )
        .await;
        exec(
            &db,
            "INSERT INTO comment_like (comment_id, member_id) VALUES (3, 1), (4, 1)",
        )
        .await;

        let repo = CascadeRepository::new(db.clone());
        repo.delete_comment(1).await.unwrap();

        let left: Vec<i32> = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .into_tuple()
            .all(db.as_ref())
            .await
            .unwrap();
        assert_eq!(left, vec![4]);
        assert_eq!(CommentLike::find().count(db.as_ref()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_network_detaches_children() {
        let db = setup_test_db().await.unwrap();
        exec(&db, "INSERT INTO network (name) VALUES ('Rede Jovem')").await;
        exec(&db, "INSERT INTO generation (name, network_id) VALUES ('G1', 1)").await;
        exec(&db, "INSERT INTO cell (name, network_id, generation_id) VALUES ('C1', 1, 1)").await;

        let repo = CascadeRepository::new(db.clone());
        repo.delete_network(1).await.unwrap();

        let generation = Generation::find_by_id(1).one(db.as_ref()).await.unwrap().unwrap();
        assert_eq!(generation.network_id, None);
        let cell = Cell::find_by_id(1).one(db.as_ref()).await.unwrap().unwrap();
        assert_eq!(cell.network_id, None);
        assert_eq!(cell.generation_id, Some(1));
        assert_eq!(Network::find().count(db.as_ref()).await.unwrap(), 0);
    }
}
