//! Testimony repository.

use std::sync::Arc;

use crate::entities::{Testimony, testimony};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Testimony repository for database operations.
#[derive(Clone)]
pub struct TestimonyRepository {
    db: Arc<DatabaseConnection>,
}

impl TestimonyRepository {
    /// Create a new testimony repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a testimony by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<testimony::Model> {
        Testimony::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Testimony {id}")))
    }

    /// Testimonies newest first, restricted to `cell_ids` when given.
    pub async fn find_by_cells(&self, cell_ids: Option<&[i32]>) -> AppResult<Vec<testimony::Model>> {
        let mut query = Testimony::find();
        if let Some(cell_ids) = cell_ids {
            if cell_ids.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(testimony::Column::CellId.is_in(cell_ids.to_vec()));
        }

        query
            .order_by_desc(testimony::Column::CreatedAt)
            .order_by_desc(testimony::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new testimony.
    pub async fn create(&self, model: testimony::ActiveModel) -> AppResult<testimony::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a testimony by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Testimony::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
