//! Generation repository.

use std::sync::Arc;

use crate::entities::{Generation, generation};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Generation repository for database operations.
#[derive(Clone)]
pub struct GenerationRepository {
    db: Arc<DatabaseConnection>,
}

impl GenerationRepository {
    /// Create a new generation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a generation by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<generation::Model>> {
        Generation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a generation by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<generation::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Generation {id}")))
    }

    /// All generations, optionally restricted to one network.
    pub async fn find_all(&self, network_id: Option<i32>) -> AppResult<Vec<generation::Model>> {
        let mut query = Generation::find().order_by_asc(generation::Column::Id);
        if let Some(network_id) = network_id {
            query = query.filter(generation::Column::NetworkId.eq(network_id));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the generations under a network.
    pub async fn find_ids_by_network(&self, network_id: i32) -> AppResult<Vec<i32>> {
        Generation::find()
            .select_only()
            .column(generation::Column::Id)
            .filter(generation::Column::NetworkId.eq(network_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new generation.
    pub async fn create(&self, model: generation::ActiveModel) -> AppResult<generation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a generation.
    pub async fn update(&self, model: generation::ActiveModel) -> AppResult<generation::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
