//! Comment endpoints: likes, replies and deletion.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, post},
};
use celula_common::AppResult;
use celula_core::CommentInput;
use celula_db::repositories::LikeTarget;

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{CommentResponse, LikeResponse, MessageResponse, message},
};

/// Toggle the viewer's like on a comment.
async fn like_comment(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LikeResponse>> {
    let toggle = state
        .interaction_service
        .toggle_like(&actor, LikeTarget::Comment(id))
        .await?;
    Ok(Json(toggle.into()))
}

/// Reply to a comment; the reply lands on the parent's event or announcement.
async fn reply(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let reply = state.interaction_service.reply(&actor, id, input).await?;
    Ok(Json(reply.into()))
}

/// Delete a comment and its replies.
async fn delete_comment(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.interaction_service.delete_comment(&actor, id).await?;
    Ok(message("Comentário removido"))
}

/// Routes acting on a single comment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/curtir", post(like_comment))
        .route("/{id}/responder", post(reply))
        .route("/{id}", delete(delete_comment))
}
