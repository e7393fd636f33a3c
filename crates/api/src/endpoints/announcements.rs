//! Announcement endpoints: the hierarchical feed, cell murals, likes and
//! comments.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use celula_common::AppResult;
use celula_core::{CommentInput, CommentTarget, CreateAnnouncementInput, UpdateAnnouncementInput};
use celula_db::repositories::LikeTarget;
use serde::Serialize;

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json, MaybeAuthUser},
    middleware::AppState,
    response::{
        AnnouncementResponse, CommentResponse, Created, LikeResponse, MessageResponse, list,
        message,
    },
};

/// Response of an announcement edit.
#[derive(Serialize)]
pub struct AnnouncementUpdatedResponse {
    pub mensagem: &'static str,
    pub aviso: AnnouncementResponse,
}

/// Announcement feed. A network or generation filter includes the nodes
/// below it.
async fn list_feed(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    let announcements = state
        .announcement_service
        .feed(
            query.network_id(),
            query.generation_id(),
            query.author_id(),
            viewer.id(),
        )
        .await?;
    Ok(list(announcements))
}

/// Mural of a cell.
async fn cell_mural(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
) -> AppResult<Json<Vec<AnnouncementResponse>>> {
    Ok(list(
        state
            .announcement_service
            .mural(cell_id, viewer.id())
            .await?,
    ))
}

/// Post an announcement to a cell; cell `0` posts without one.
async fn post_to_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<Created<AnnouncementResponse>> {
    let announcement = state
        .announcement_service
        .create(&actor, cell_id, input)
        .await?;
    Ok(Created(announcement.into()))
}

/// Edit an announcement; only its author or a leader may.
async fn update_announcement(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateAnnouncementInput>,
) -> AppResult<Json<AnnouncementUpdatedResponse>> {
    let announcement = state
        .announcement_service
        .update(&actor, id, input)
        .await?;

    Ok(Json(AnnouncementUpdatedResponse {
        mensagem: "Aviso atualizado",
        aviso: announcement.into(),
    }))
}

/// Delete an announcement together with its likes and comments.
async fn delete_announcement(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.announcement_service.delete(&actor, id).await?;
    Ok(message("Aviso removido"))
}

/// Toggle the viewer's like on an announcement.
async fn like_announcement(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LikeResponse>> {
    let toggle = state
        .interaction_service
        .toggle_like(&actor, LikeTarget::Announcement(id))
        .await?;
    Ok(Json(toggle.into()))
}

/// Comment on an announcement.
async fn comment_announcement(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .interaction_service
        .comment(&actor, CommentTarget::Announcement(id), input)
        .await?;
    Ok(Json(comment.into()))
}

/// Comment tree of an announcement.
async fn list_announcement_comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    Ok(list(
        state
            .interaction_service
            .list(CommentTarget::Announcement(id), viewer.id())
            .await?,
    ))
}

/// Announcement routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/avisos", get(list_feed))
        .route(
            "/avisos/{id}",
            put(update_announcement).delete(delete_announcement),
        )
        .route("/avisos/{id}/curtir", post(like_announcement))
        .route("/avisos/{id}/comentar", post(comment_announcement))
        .route("/avisos/{id}/comentarios", get(list_announcement_comments))
        .route("/celulas/{id}/avisos", get(cell_mural).post(post_to_cell))
}
