//! Story endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use celula_common::AppResult;
use celula_core::CreateStoryInput;

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{Created, MessageResponse, StoryResponse, list, message},
};

/// Stories from the last 24 hours.
async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<StoryResponse>>> {
    let stories = state
        .story_service
        .list(query.network_id(), query.generation_id(), query.author_id())
        .await?;
    Ok(list(stories))
}

/// Post a story.
async fn create_story(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStoryInput>,
) -> AppResult<Created<StoryResponse>> {
    let story = state.story_service.create(&actor, input).await?;
    Ok(Created(story.into()))
}

/// Delete a story.
async fn delete_story(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.story_service.delete(&actor, id).await?;
    Ok(message("Story removido"))
}

/// Story routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stories).post(create_story))
        .route("/{id}", delete(delete_story))
}
