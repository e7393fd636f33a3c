//! Announcement repository.

use std::sync::Arc;

use super::ScopeFilter;
use crate::entities::{Announcement, announcement};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Announcement repository for database operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an announcement by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an announcement by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<announcement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {id}")))
    }

    /// Announcements newest first.
    ///
    /// `scope` restricts to rows matching any listed node (an empty scope
    /// matches nothing); `None` means no hierarchy restriction.
    pub async fn find_feed(
        &self,
        scope: Option<&ScopeFilter>,
        author_id: Option<i32>,
    ) -> AppResult<Vec<announcement::Model>> {
        let mut query = Announcement::find();

        if let Some(scope) = scope {
            if scope.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(scope.condition(
                announcement::Column::NetworkId,
                announcement::Column::GenerationId,
                announcement::Column::CellId,
            ));
        }

        if let Some(author_id) = author_id {
            query = query.filter(announcement::Column::AuthorId.eq(author_id));
        }

        query
            .order_by_desc(announcement::Column::CreatedAt)
            .order_by_desc(announcement::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new announcement.
    pub async fn create(
        &self,
        model: announcement::ActiveModel,
    ) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an announcement.
    pub async fn update(
        &self,
        model: announcement::ActiveModel,
    ) -> AppResult<announcement::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
