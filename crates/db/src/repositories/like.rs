//! Like repository: likes on events, announcements and comments.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::entities::{CommentLike, PostLike, comment_like, post_like};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};

/// Something a member can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Event(i32),
    Announcement(i32),
    Comment(i32),
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the member likes the target after the toggle.
    pub liked: bool,
    /// Likes on the target after the toggle.
    pub total: u64,
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Flip the like of `member_id` on `target` in one transaction.
    ///
    /// The existing row is deleted first; when there was none a row is
    /// inserted. An insert that loses a race against a concurrent toggle hits
    /// the unique index and is counted as liked.
    pub async fn toggle(&self, target: LikeTarget, member_id: i32) -> AppResult<LikeToggle> {
        let txn = self.db.begin().await?;

        let removed = delete_like(&txn, target, member_id).await?;
        let liked = if removed > 0 {
            false
        } else {
            insert_like(&txn, target, member_id).await?;
            true
        };
        let total = count_likes(&txn, target).await?;

        txn.commit().await?;

        tracing::debug!(?target, member_id, liked, total, "Toggled like");
        Ok(LikeToggle { liked, total })
    }

    /// Number of likes on `target`.
    pub async fn count(&self, target: LikeTarget) -> AppResult<u64> {
        let count = match target {
            LikeTarget::Event(id) => PostLike::find()
                .filter(post_like::Column::EventId.eq(id))
                .count(self.db.as_ref())
                .await,
            LikeTarget::Announcement(id) => PostLike::find()
                .filter(post_like::Column::AnnouncementId.eq(id))
                .count(self.db.as_ref())
                .await,
            LikeTarget::Comment(id) => CommentLike::find()
                .filter(comment_like::Column::CommentId.eq(id))
                .count(self.db.as_ref())
                .await,
        };
        count.map_err(|e| AppError::Database(e.to_string()))
    }

    /// Like counts per event.
    pub async fn count_by_events(&self, ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<PostLike, _, _>(self.db.as_ref(), post_like::Column::EventId, ids)
            .await
    }

    /// Like counts per announcement.
    pub async fn count_by_announcements(&self, ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<PostLike, _, _>(
            self.db.as_ref(),
            post_like::Column::AnnouncementId,
            ids,
        )
        .await
    }

    /// Like counts per comment.
    pub async fn count_by_comments(&self, ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<CommentLike, _, _>(
            self.db.as_ref(),
            comment_like::Column::CommentId,
            ids,
        )
        .await
    }

    /// The events among `ids` liked by `member_id`.
    pub async fn liked_events(&self, member_id: i32, ids: &[i32]) -> AppResult<HashSet<i32>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<Option<i32>> = PostLike::find()
            .select_only()
            .column(post_like::Column::EventId)
            .filter(post_like::Column::MemberId.eq(member_id))
            .filter(post_like::Column::EventId.is_in(ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().flatten().collect())
    }

    /// The announcements among `ids` liked by `member_id`.
    pub async fn liked_announcements(
        &self,
        member_id: i32,
        ids: &[i32],
    ) -> AppResult<HashSet<i32>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<Option<i32>> = PostLike::find()
            .select_only()
            .column(post_like::Column::AnnouncementId)
            .filter(post_like::Column::MemberId.eq(member_id))
            .filter(post_like::Column::AnnouncementId.is_in(ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().flatten().collect())
    }

    /// The comments among `ids` liked by `member_id`.
    pub async fn liked_comments(&self, member_id: i32, ids: &[i32]) -> AppResult<HashSet<i32>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<i32> = CommentLike::find()
            .select_only()
            .column(comment_like::Column::CommentId)
            .filter(comment_like::Column::MemberId.eq(member_id))
            .filter(comment_like::Column::CommentId.is_in(ids.to_vec()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().collect())
    }
}

async fn delete_like(
    txn: &DatabaseTransaction,
    target: LikeTarget,
    member_id: i32,
) -> Result<u64, DbErr> {
    let result = match target {
        LikeTarget::Event(id) => {
            PostLike::delete_many()
                .filter(post_like::Column::EventId.eq(id))
                .filter(post_like::Column::MemberId.eq(member_id))
                .exec(txn)
                .await?
        }
        LikeTarget::Announcement(id) => {
            PostLike::delete_many()
                .filter(post_like::Column::AnnouncementId.eq(id))
                .filter(post_like::Column::MemberId.eq(member_id))
                .exec(txn)
                .await?
        }
        LikeTarget::Comment(id) => {
            CommentLike::delete_many()
                .filter(comment_like::Column::CommentId.eq(id))
                .filter(comment_like::Column::MemberId.eq(member_id))
                .exec(txn)
                .await?
        }
    };
    Ok(result.rows_affected)
}

/// Insert the like row; a conflicting row already present is left alone.
async fn insert_like(
    txn: &DatabaseTransaction,
    target: LikeTarget,
    member_id: i32,
) -> Result<(), DbErr> {
    let result = match target {
        LikeTarget::Event(id) => {
            let model = post_like::ActiveModel {
                event_id: Set(Some(id)),
                member_id: Set(member_id),
                ..Default::default()
            };
            PostLike::insert(model)
                .on_conflict(
                    OnConflict::columns([post_like::Column::EventId, post_like::Column::MemberId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await
        }
        LikeTarget::Announcement(id) => {
            let model = post_like::ActiveModel {
                announcement_id: Set(Some(id)),
                member_id: Set(member_id),
                ..Default::default()
            };
            PostLike::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        post_like::Column::AnnouncementId,
                        post_like::Column::MemberId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(txn)
                .await
        }
        LikeTarget::Comment(id) => {
            let model = comment_like::ActiveModel {
                comment_id: Set(id),
                member_id: Set(member_id),
                ..Default::default()
            };
            CommentLike::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        comment_like::Column::CommentId,
                        comment_like::Column::MemberId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(txn)
                .await
        }
    };

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

async fn count_likes(txn: &DatabaseTransaction, target: LikeTarget) -> Result<u64, DbErr> {
    match target {
        LikeTarget::Event(id) => {
            PostLike::find()
                .filter(post_like::Column::EventId.eq(id))
                .count(txn)
                .await
        }
        LikeTarget::Announcement(id) => {
            PostLike::find()
                .filter(post_like::Column::AnnouncementId.eq(id))
                .count(txn)
                .await
        }
        LikeTarget::Comment(id) => {
            CommentLike::find()
                .filter(comment_like::Column::CommentId.eq(id))
                .count(txn)
                .await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::ConnectionTrait;

    async fn seed(db: &DatabaseConnection) {
        db.execute_unprepared(
            "INSERT INTO member (name, role, attended_encounter, created_at) VALUES \
             ('Ana', 'Membro', false, '2025-01-01T00:00:00Z'), \
             ('Bruno', 'Membro', false, '2025-01-01T00:00:00Z')",
        )
        .await
        .unwrap();
        db.execute_unprepared("INSERT INTO event (title) VALUES ('Conferência')")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_toggle_like_then_unlike() {
        let db = setup_test_db().await.unwrap();
        seed(db.as_ref()).await;
        let repo = LikeRepository::new(db);

        let first = repo.toggle(LikeTarget::Event(1), 1).await.unwrap();
        assert_eq!(first, LikeToggle { liked: true, total: 1 });

        let other = repo.toggle(LikeTarget::Event(1), 2).await.unwrap();
        assert_eq!(other, LikeToggle { liked: true, total: 2 });

        let second = repo.toggle(LikeTarget::Event(1), 1).await.unwrap();
        assert_eq!(second, LikeToggle { liked: false, total: 1 });
        assert_eq!(repo.count(LikeTarget::Event(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_liked_events_for_member() {
        let db = setup_test_db().await.unwrap();
        seed(db.as_ref()).await;
        let repo = LikeRepository::new(db);

        repo.toggle(LikeTarget::Event(1), 2).await.unwrap();

        assert!(repo.liked_events(2, &[1]).await.unwrap().contains(&1));
        assert!(repo.liked_events(1, &[1]).await.unwrap().is_empty());
        assert_eq!(repo.count_by_events(&[1]).await.unwrap().get(&1), Some(&1));
    }
}
