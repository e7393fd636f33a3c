//! Meeting and attendance repository.

use std::sync::Arc;

use crate::entities::{Attendance, Meeting, attendance, meeting};
use celula_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Meeting repository for database operations.
#[derive(Clone)]
pub struct MeetingRepository {
    db: Arc<DatabaseConnection>,
}

impl MeetingRepository {
    /// Create a new meeting repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a meeting by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<meeting::Model>> {
        Meeting::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Meetings most recent first, optionally for one cell.
    pub async fn find_all(&self, cell_id: Option<i32>) -> AppResult<Vec<meeting::Model>> {
        let mut query = Meeting::find();
        if let Some(cell_id) = cell_id {
            query = query.filter(meeting::Column::CellId.eq(cell_id));
        }

        query
            .order_by_desc(meeting::Column::HeldAt)
            .order_by_desc(meeting::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the `limit` most recent meetings of a cell.
    pub async fn find_recent_ids(&self, cell_id: i32, limit: u64) -> AppResult<Vec<i32>> {
        Meeting::find()
            .select_only()
            .column(meeting::Column::Id)
            .filter(meeting::Column::CellId.eq(cell_id))
            .order_by_desc(meeting::Column::HeldAt)
            .order_by_desc(meeting::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new meeting.
    pub async fn create(&self, model: meeting::ActiveModel) -> AppResult<meeting::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the attendance of a meeting with one present row per member.
    ///
    /// Runs in one transaction; duplicate member ids collapse into one row.
    pub async fn replace_attendance(&self, meeting_id: i32, member_ids: &[i32]) -> AppResult<()> {
        let mut present: Vec<i32> = member_ids.to_vec();
        present.sort_unstable();
        present.dedup();

        let txn = self.db.begin().await?;

        Attendance::delete_many()
            .filter(attendance::Column::MeetingId.eq(meeting_id))
            .exec(&txn)
            .await?;

        if !present.is_empty() {
            let rows = present.iter().map(|member_id| attendance::ActiveModel {
                meeting_id: Set(meeting_id),
                member_id: Set(*member_id),
                present: Set(true),
                ..Default::default()
            });
            Attendance::insert_many(rows).exec_without_returning(&txn).await?;
        }

        txn.commit().await?;

        tracing::debug!(meeting_id, present = present.len(), "Replaced attendance");
        Ok(())
    }

    /// Attendance rows of a meeting.
    pub async fn find_attendance(&self, meeting_id: i32) -> AppResult<Vec<attendance::Model>> {
        Attendance::find()
            .filter(attendance::Column::MeetingId.eq(meeting_id))
            .order_by_asc(attendance::Column::MemberId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of present rows across the given meetings.
    pub async fn count_present(&self, meeting_ids: &[i32]) -> AppResult<u64> {
        if meeting_ids.is_empty() {
            return Ok(0);
        }

        Attendance::find()
            .filter(attendance::Column::MeetingId.is_in(meeting_ids.to_vec()))
            .filter(attendance::Column::Present.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::ConnectionTrait;

    async fn seed(db: &DatabaseConnection) {
        db.execute_unprepared("INSERT INTO cell (name) VALUES ('Betel')")
            .await
            .unwrap();
        db.execute_unprepared(
            "INSERT INTO member (name, role, attended_encounter, created_at, cell_id) VALUES \
             ('Ana', 'Membro', false, '2025-01-01T00:00:00Z', 1), \
             ('Bruno', 'Membro', false, '2025-01-01T00:00:00Z', 1), \
             ('Carla', 'Visitante', false, '2025-01-01T00:00:00Z', 1)",
        )
        .await
        .unwrap();
        db.execute_unprepared(
            "INSERT INTO meeting (cell_id, held_at) VALUES (1, '2025-02-01 20:00:00')",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_replace_attendance_is_idempotent() {
        let db = setup_test_db().await.unwrap();
        seed(db.as_ref()).await;
        let repo = MeetingRepository::new(db);

        repo.replace_attendance(1, &[1, 2]).await.unwrap();
        repo.replace_attendance(1, &[1, 2, 2]).await.unwrap();

        let rows = repo.find_attendance(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.present));

        repo.replace_attendance(1, &[3]).await.unwrap();
        let rows = repo.find_attendance(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].member_id, 3);
    }

    #[tokio::test]
    async fn test_count_present_without_meetings() {
        let db = setup_test_db().await.unwrap();
        let repo = MeetingRepository::new(db);

        assert_eq!(repo.count_present(&[]).await.unwrap(), 0);
        assert!(repo.find_recent_ids(1, 4).await.unwrap().is_empty());
    }
}
