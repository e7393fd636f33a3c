//! Member repository.

use std::sync::Arc;

use crate::entities::{Member, member};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Member repository for database operations.
#[derive(Clone)]
pub struct MemberRepository {
    db: Arc<DatabaseConnection>,
}

impl MemberRepository {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a member by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<member::Model>> {
        Member::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a member by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<member::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::MemberNotFound(id))
    }

    /// Find members by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<member::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Member::find()
            .filter(member::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a member by login email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<member::Model>> {
        Member::find()
            .filter(member::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a member by session token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<member::Model>> {
        Member::find()
            .filter(member::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All members, alphabetical.
    pub async fn find_all(&self) -> AppResult<Vec<member::Model>> {
        Member::find()
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Members of one cell.
    pub async fn find_by_cell(&self, cell_id: i32) -> AppResult<Vec<member::Model>> {
        Member::find()
            .filter(member::Column::CellId.eq(cell_id))
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Members of several cells.
    pub async fn find_by_cells(&self, cell_ids: &[i32]) -> AppResult<Vec<member::Model>> {
        if cell_ids.is_empty() {
            return Ok(vec![]);
        }

        Member::find()
            .filter(member::Column::CellId.is_in(cell_ids.to_vec()))
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Members not attached to any cell.
    pub async fn find_without_cell(&self) -> AppResult<Vec<member::Model>> {
        Member::find()
            .filter(member::Column::CellId.is_null())
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the members of a cell holding `role`.
    pub async fn count_by_cell_and_role(
        &self,
        cell_id: i32,
        role: member::Role,
    ) -> AppResult<u64> {
        Member::find()
            .filter(member::Column::CellId.eq(cell_id))
            .filter(member::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an email is used by a member other than `except_id`.
    pub async fn email_taken(&self, email: &str, except_id: Option<i32>) -> AppResult<bool> {
        let mut query = Member::find().filter(member::Column::Email.eq(email));
        if let Some(id) = except_id {
            query = query.filter(member::Column::Id.ne(id));
        }

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new member.
    pub async fn create(&self, model: member::ActiveModel) -> AppResult<member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a member.
    pub async fn update(&self, model: member::ActiveModel) -> AppResult<member::Model> {
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_member(id: i32, email: &str) -> member::Model {
        member::Model {
            id,
            name: "Maria".to_string(),
            cell_id: Some(1),
            network_id: None,
            generation_id: None,
            phone: None,
            birth_date: None,
            address: None,
            number: None,
            district: None,
            city: None,
            state: None,
            zip_code: None,
            role: member::Role::Member,
            conversion_date: None,
            email: Some(email.to_string()),
            password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
            token: Some("tok".to_string()),
            attended_encounter: false,
            bio: None,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let member = create_test_member(1, "maria@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[member.clone()]])
                .into_connection(),
        );

        let repo = MemberRepository::new(db);
        let result = repo.find_by_email("maria@example.com").await.unwrap();

        assert_eq!(result.map(|m| m.id), Some(1));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<member::Model>::new()])
                .into_connection(),
        );

        let repo = MemberRepository::new(db);
        let result = repo.get_by_id(42).await;

        assert!(matches!(result, Err(AppError::MemberNotFound(42))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let repo = MemberRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_role_serializes_with_wire_labels() {
        let json = serde_json::to_string(&member::Role::NetworkLeader).unwrap();
        assert_eq!(json, "\"LiderRede\"");
        assert!(member::Role::Admin.is_leader());
        assert!(!member::Role::Visitor.is_leader());
        assert_eq!(member::Role::GenerationLeader.as_str(), "LiderGeracao");
    }
}
