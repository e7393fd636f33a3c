//! Event service.

use std::collections::HashSet;

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{event, member},
    repositories::{CascadeRepository, CommentRepository, EventRepository, LikeRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::access::ensure_admin;
use super::input::{deserialize_some, parse_datetime};

/// Service for church events.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    cascade_repo: CascadeRepository,
}

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventInput {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(rename = "descricao")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(rename = "data_evento")]
    pub starts_at: Option<String>,
    #[serde(rename = "local")]
    pub location: Option<String>,
    #[serde(rename = "foto_url")]
    pub photo_url: Option<String>,
}

/// Partial update of an event.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEventInput {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[serde(rename = "descricao", default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    /// Unparseable dates leave the current value untouched.
    #[serde(rename = "data_evento", default, deserialize_with = "deserialize_some")]
    pub starts_at: Option<Option<String>>,
    #[serde(rename = "local", default, deserialize_with = "deserialize_some")]
    pub location: Option<Option<String>>,
    #[serde(rename = "foto_url", default, deserialize_with = "deserialize_some")]
    pub photo_url: Option<Option<String>>,
}

/// An event with its interaction counters.
#[derive(Debug, Clone)]
pub struct EventView {
    pub event: event::Model,
    pub total_likes: i64,
    pub total_comments: i64,
    /// Set only when the viewer is known.
    pub liked_by_me: Option<bool>,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(
        event_repo: EventRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        cascade_repo: CascadeRepository,
    ) -> Self {
        Self {
            event_repo,
            like_repo,
            comment_repo,
            cascade_repo,
        }
    }

    /// All events, soonest first.
    pub async fn list(&self, viewer: Option<i32>) -> AppResult<Vec<EventView>> {
        let events = self.event_repo.find_all().await?;
        self.views(events, viewer).await
    }

    /// Get one event.
    pub async fn get(&self, id: i32, viewer: Option<i32>) -> AppResult<EventView> {
        let event = self.event_repo.get_by_id(id).await?;
        self.views(vec![event], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Event {id}")))
    }

    /// Create an event (admin only).
    pub async fn create(
        &self,
        actor: &member::Model,
        input: CreateEventInput,
    ) -> AppResult<EventView> {
        ensure_admin(actor)?;
        input.validate()?;

        let starts_at = match input.starts_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                parse_datetime(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("Data inválida: {raw}")))?,
            ),
        };

        let model = event::ActiveModel {
            title: Set(input.title.trim().to_string()),
            description: Set(input.description),
            starts_at: Set(starts_at),
            location: Set(input.location),
            photo_url: Set(input.photo_url),
            ..Default::default()
        };

        let event = self.event_repo.create(model).await?;
        tracing::info!(event_id = event.id, "Created event");
        self.get(event.id, Some(actor.id)).await
    }

    /// Apply a partial update to an event (admin only).
    pub async fn update(
        &self,
        actor: &member::Model,
        id: i32,
        input: UpdateEventInput,
    ) -> AppResult<EventView> {
        ensure_admin(actor)?;
        input.validate()?;

        let event = self.event_repo.get_by_id(id).await?;
        let mut active: event::ActiveModel = event.into();

        if let Some(title) = input.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        match input.starts_at {
            Some(None) => active.starts_at = Set(None),
            Some(Some(raw)) => {
                if let Some(starts_at) = parse_datetime(&raw) {
                    active.starts_at = Set(Some(starts_at));
                }
            }
            None => {}
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(photo_url) = input.photo_url {
            active.photo_url = Set(photo_url);
        }

        self.event_repo.update(active).await?;
        self.get(id, Some(actor.id)).await
    }

    /// Delete an event with its likes and comments (admin only).
    pub async fn delete(&self, actor: &member::Model, id: i32) -> AppResult<()> {
        ensure_admin(actor)?;
        self.event_repo.get_by_id(id).await?;
        self.cascade_repo.delete_event(id).await
    }

    async fn views(
        &self,
        events: Vec<event::Model>,
        viewer: Option<i32>,
    ) -> AppResult<Vec<EventView>> {
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        let likes = self.like_repo.count_by_events(&ids).await?;
        let comments = self.comment_repo.count_by_events(&ids).await?;
        let liked: Option<HashSet<i32>> = match viewer {
            Some(member_id) => Some(self.like_repo.liked_events(member_id, &ids).await?),
            None => None,
        };

        Ok(events
            .into_iter()
            .map(|event| EventView {
                total_likes: likes.get(&event.id).copied().unwrap_or(0),
                total_comments: comments.get(&event.id).copied().unwrap_or(0),
                liked_by_me: liked.as_ref().map(|set| set.contains(&event.id)),
                event,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::access::tests::member_with_role;
    use celula_db::entities::member::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> EventService {
        let db = Arc::new(db);
        EventService::new(
            EventRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            CascadeRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_event_requires_admin() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let input: CreateEventInput =
            serde_json::from_value(json!({"titulo": "Retiro"})).unwrap();

        let result = service
            .create(&member_with_role(1, Role::Leader), input)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_event_rejects_bad_date() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let input: CreateEventInput =
            serde_json::from_value(json!({"titulo": "Retiro", "data_evento": "sábado"})).unwrap();

        let result = service.create(&member_with_role(1, Role::Admin), input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_event_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.get(9, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
