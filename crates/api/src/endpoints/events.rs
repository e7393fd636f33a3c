//! Event endpoints, including likes and comments on events.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use celula_common::AppResult;
use celula_core::{CommentInput, CommentTarget, CreateEventInput, UpdateEventInput};
use celula_db::repositories::LikeTarget;

use crate::{
    extractors::{AuthUser, Json, MaybeAuthUser},
    middleware::AppState,
    response::{
        CommentResponse, Created, EventResponse, LikeResponse, MessageResponse, list, message,
    },
};

/// All events, soonest first.
async fn list_events(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EventResponse>>> {
    Ok(list(state.event_service.list(viewer.id()).await?))
}

/// One event.
async fn get_event(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EventResponse>> {
    Ok(Json(state.event_service.get(id, viewer.id()).await?.into()))
}

/// Create an event.
async fn create_event(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> AppResult<Created<EventResponse>> {
    let event = state.event_service.create(&actor, input).await?;
    Ok(Created(event.into()))
}

/// Edit an event.
async fn update_event(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateEventInput>,
) -> AppResult<Json<EventResponse>> {
    let event = state.event_service.update(&actor, id, input).await?;
    Ok(Json(event.into()))
}

/// Delete an event together with its likes and comments.
async fn delete_event(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.event_service.delete(&actor, id).await?;
    Ok(message("Evento removido"))
}

/// Toggle the viewer's like on an event.
async fn like_event(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LikeResponse>> {
    let toggle = state
        .interaction_service
        .toggle_like(&actor, LikeTarget::Event(id))
        .await?;
    Ok(Json(toggle.into()))
}

/// Comment on an event.
async fn comment_event(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .interaction_service
        .comment(&actor, CommentTarget::Event(id), input)
        .await?;
    Ok(Json(comment.into()))
}

/// Comment tree of an event.
async fn list_event_comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    Ok(list(
        state
            .interaction_service
            .list(CommentTarget::Event(id), viewer.id())
            .await?,
    ))
}

/// Event routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/{id}/curtir", post(like_event))
        .route("/{id}/comentar", post(comment_event))
        .route("/{id}/comentarios", get(list_event_comments))
}
