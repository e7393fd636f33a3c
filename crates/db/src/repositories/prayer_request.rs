//! Prayer request repository.

use std::sync::Arc;

use crate::entities::{PrayerRequest, prayer_request};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Prayer request repository for database operations.
#[derive(Clone)]
pub struct PrayerRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl PrayerRequestRepository {
    /// Create a new prayer request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a prayer request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<prayer_request::Model> {
        PrayerRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Prayer request {id}")))
    }

    /// Prayer requests newest first, restricted to `cell_ids` when given.
    pub async fn find_by_cells(
        &self,
        cell_ids: Option<&[i32]>,
    ) -> AppResult<Vec<prayer_request::Model>> {
        let mut query = PrayerRequest::find();
        if let Some(cell_ids) = cell_ids {
            if cell_ids.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(prayer_request::Column::CellId.is_in(cell_ids.to_vec()));
        }

        query
            .order_by_desc(prayer_request::Column::CreatedAt)
            .order_by_desc(prayer_request::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new prayer request.
    pub async fn create(
        &self,
        model: prayer_request::ActiveModel,
    ) -> AppResult<prayer_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a prayer request.
    pub async fn update(
        &self,
        model: prayer_request::ActiveModel,
    ) -> AppResult<prayer_request::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a prayer request by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        PrayerRequest::delete_by_id(id)
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_empty_cell_list_matches_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let repo = PrayerRequestRepository::new(db);
        let result = repo.find_by_cells(Some(&[])).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_cells() {
        let request = prayer_request::Model {
            id: 1,
            cell_id: 3,
            member_id: 8,
            text: "Pela saúde da minha mãe".to_string(),
            created_at: chrono::Utc::now(),
            resolved: false,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[request.clone()]])
                .into_connection(),
        );

        let repo = PrayerRequestRepository::new(db);
        let result = repo.find_by_cells(Some(&[3])).await.unwrap();

        assert_eq!(result, vec![request]);
    }
}
