//! Repository layer for database operations.

mod announcement;
mod cascade;
mod catalog;
mod cell;
mod comment;
mod event;
mod generation;
mod like;
mod meeting;
mod member;
mod network;
mod prayer_request;
mod scope;
mod story;
mod testimony;

pub use announcement::AnnouncementRepository;
pub use cascade::CascadeRepository;
pub use catalog::{SchoolRepository, StudyRepository};
pub use cell::CellRepository;
pub use comment::CommentRepository;
pub use event::EventRepository;
pub use generation::GenerationRepository;
pub use like::{LikeRepository, LikeTarget, LikeToggle};
pub use meeting::MeetingRepository;
pub use member::MemberRepository;
pub use network::NetworkRepository;
pub use prayer_request::PrayerRequestRepository;
pub use scope::ScopeFilter;
pub use story::StoryRepository;
pub use testimony::TestimonyRepository;

use std::collections::HashMap;

use celula_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, sea_query::Expr,
};

/// Count rows of `E` grouped by `column`, for the given column values.
pub(crate) async fn count_grouped<E, C, D>(
    db: &D,
    column: C,
    ids: &[i32],
) -> AppResult<HashMap<i32, i64>>
where
    E: EntityTrait,
    C: ColumnTrait + 'static,
    D: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Option<i32>, i64)> = E::find()
        .select_only()
        .column(column)
        .column_as(Expr::col(column).count(), "total")
        .filter(column.is_in(ids.to_vec()))
        .group_by(column)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, total)| id.map(|id| (id, total)))
        .collect())
}
