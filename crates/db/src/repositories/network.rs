//! Network repository.

use std::sync::Arc;

use crate::entities::{Network, network};
use celula_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Network repository for database operations.
#[derive(Clone)]
pub struct NetworkRepository {
    db: Arc<DatabaseConnection>,
}

impl NetworkRepository {
    /// Create a new network repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a network by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<network::Model>> {
        Network::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a network by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<network::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Network {id}")))
    }

    /// All networks in creation order.
    pub async fn find_all(&self) -> AppResult<Vec<network::Model>> {
        Network::find()
            .order_by_asc(network::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a network by name, ignoring case and surrounding whitespace.
    ///
    /// Compared in Rust so accented names fold the same way on every backend.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<network::Model>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .find(|n| n.name.trim().to_lowercase() == wanted))
    }

    /// Create a new network.
    pub async fn create(&self, model: network::ActiveModel) -> AppResult<network::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a network.
    pub async fn update(&self, model: network::ActiveModel) -> AppResult<network::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
