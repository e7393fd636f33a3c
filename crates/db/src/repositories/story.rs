//! Story repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::ScopeFilter;
use crate::entities::{Story, story};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Story repository for database operations.
#[derive(Clone)]
pub struct StoryRepository {
    db: Arc<DatabaseConnection>,
}

impl StoryRepository {
    /// Create a new story repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a story by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<story::Model>> {
        Story::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a story by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<story::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Story {id}")))
    }

    /// Stories created at or after `since`, newest first.
    ///
    /// `scope` works as for announcements: `None` is unrestricted, an empty
    /// scope matches nothing.
    pub async fn find_since(
        &self,
        since: DateTime<Utc>,
        scope: Option<&ScopeFilter>,
        author_id: Option<i32>,
    ) -> AppResult<Vec<story::Model>> {
        let mut query = Story::find().filter(story::Column::CreatedAt.gte(since));

        if let Some(scope) = scope {
            if scope.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(scope.condition(
                story::Column::NetworkId,
                story::Column::GenerationId,
                story::Column::CellId,
            ));
        }

        if let Some(author_id) = author_id {
            query = query.filter(story::Column::AuthorId.eq(author_id));
        }

        query
            .order_by_desc(story::Column::CreatedAt)
            .order_by_desc(story::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new story.
    pub async fn create(&self, model: story::ActiveModel) -> AppResult<story::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a story by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Story::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_since_empty_scope() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let repo = StoryRepository::new(db);
        let result = repo
            .find_since(Utc::now(), Some(&ScopeFilter::default()), None)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = StoryRepository::new(db);
        assert!(repo.delete(3).await.is_ok());
    }
}
