//! Cell repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Cell, Member, cell, member};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Cell repository for database operations.
#[derive(Clone)]
pub struct CellRepository {
    db: Arc<DatabaseConnection>,
}

impl CellRepository {
    /// Create a new cell repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a cell by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<cell::Model>> {
        Cell::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a cell by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<cell::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::CellNotFound(id))
    }

    /// All cells in creation order.
    pub async fn find_all(&self) -> AppResult<Vec<cell::Model>> {
        Cell::find()
            .order_by_asc(cell::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Cells of one generation.
    pub async fn find_by_generation(&self, generation_id: i32) -> AppResult<Vec<cell::Model>> {
        Cell::find()
            .filter(cell::Column::GenerationId.eq(generation_id))
            .order_by_asc(cell::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the cells of one generation.
    pub async fn find_ids_by_generation(&self, generation_id: i32) -> AppResult<Vec<i32>> {
        Cell::find()
            .select_only()
            .column(cell::Column::Id)
            .filter(cell::Column::GenerationId.eq(generation_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the cells under a network: attached directly or through one of
    /// `generation_ids`.
    pub async fn find_ids_in_network(
        &self,
        network_id: i32,
        generation_ids: &[i32],
    ) -> AppResult<Vec<i32>> {
        let mut condition = Condition::any().add(cell::Column::NetworkId.eq(network_id));
        if !generation_ids.is_empty() {
            condition = condition.add(cell::Column::GenerationId.is_in(generation_ids.to_vec()));
        }

        Cell::find()
            .select_only()
            .column(cell::Column::Id)
            .filter(condition)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of members per cell for the given cells.
    pub async fn count_members(&self, cell_ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        super::count_grouped::<Member, _, _>(self.db.as_ref(), member::Column::CellId, cell_ids)
            .await
    }

    /// Create a new cell.
    pub async fn create(&self, model: cell::ActiveModel) -> AppResult<cell::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a cell.
    pub async fn update(&self, model: cell::ActiveModel) -> AppResult<cell::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_cell(id: i32, generation_id: Option<i32>) -> cell::Model {
        cell::Model {
            id,
            name: format!("Célula {id}"),
            leader: None,
            trainee_leader: None,
            network_id: None,
            generation_id,
            address: None,
            number: None,
            district: None,
            city: None,
            state: None,
            zip_code: None,
            latitude: None,
            longitude: None,
            meeting_day: None,
            meeting_time: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<cell::Model>::new()])
                .into_connection(),
        );

        let repo = CellRepository::new(db);
        let result = repo.get_by_id(4).await;

        assert!(matches!(result, Err(AppError::CellNotFound(4))));
    }

    #[tokio::test]
    async fn test_find_by_generation() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[create_test_cell(1, Some(2)), create_test_cell(3, Some(2))]])
                .into_connection(),
        );

        let repo = CellRepository::new(db);
        let result = repo.find_by_generation(2).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.generation_id == Some(2)));
    }

    #[tokio::test]
    async fn test_count_members_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let repo = CellRepository::new(db);
        let counts = repo.count_members(&[]).await.unwrap();

        assert!(counts.is_empty());
    }
}
