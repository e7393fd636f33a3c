//! School and study catalog repositories.

use std::sync::Arc;

use crate::entities::{School, Study, school, study};
use celula_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// School repository for database operations.
#[derive(Clone)]
pub struct SchoolRepository {
    db: Arc<DatabaseConnection>,
}

impl SchoolRepository {
    /// Create a new school repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a school by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<school::Model> {
        School::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("School {id}")))
    }

    /// All schools in creation order.
    pub async fn find_all(&self) -> AppResult<Vec<school::Model>> {
        School::find()
            .order_by_asc(school::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new school.
    pub async fn create(&self, model: school::ActiveModel) -> AppResult<school::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a school.
    pub async fn update(&self, model: school::ActiveModel) -> AppResult<school::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a school by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        School::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Study repository for database operations.
#[derive(Clone)]
pub struct StudyRepository {
    db: Arc<DatabaseConnection>,
}

impl StudyRepository {
    /// Create a new study repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All studies, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<study::Model>> {
        Study::find()
            .order_by_desc(study::Column::PublishedAt)
            .order_by_desc(study::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new study.
    pub async fn create(&self, model: study::ActiveModel) -> AppResult<study::Model> {
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_school_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<school::Model>::new()])
                .into_connection(),
        );

        let repo = SchoolRepository::new(db);
        assert!(matches!(repo.get_by_id(1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_studies() {
        let study = study::Model {
            id: 1,
            title: "A Importância da Oração".to_string(),
            content_link: Some("http://link.com/pdf".to_string()),
            published_at: chrono::Utc::now(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[study.clone()]])
                .into_connection(),
        );

        let repo = StudyRepository::new(db);
        assert_eq!(repo.find_all().await.unwrap(), vec![study]);
    }
}
