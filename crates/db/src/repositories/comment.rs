//! Comment repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Comment, comment};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {id}")))
    }

    /// Every comment on an event, replies included, newest first.
    pub async fn find_by_event(&self, event_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::EventId.eq(event_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every comment on an announcement, replies included, newest first.
    pub async fn find_by_announcement(
        &self,
        announcement_id: i32,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::AnnouncementId.eq(announcement_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comment counts per event, replies included.
    pub async fn count_by_events(&self, ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<Comment, _, _>(self.db.as_ref(), comment::Column::EventId, ids)
            .await
    }

    /// Comment counts per announcement, replies included.
    pub async fn count_by_announcements(&self, ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<Comment, _, _>(
            self.db.as_ref(),
            comment::Column::AnnouncementId,
            ids,
        )
        .await
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: i32, parent_id: Option<i32>) -> comment::Model {
        comment::Model {
            id,
            text: "Amém!".to_string(),
            created_at: Utc::now(),
            event_id: Some(1),
            announcement_id: None,
            member_id: 1,
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_find_by_event_includes_replies() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[create_test_comment(2, Some(1)), create_test_comment(1, None)]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_event(1).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].parent_id, Some(1));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(matches!(repo.get_by_id(5).await, Err(AppError::NotFound(_))));
    }
}
