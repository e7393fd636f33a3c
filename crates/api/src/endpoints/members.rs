//! Member administration endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use celula_common::AppResult;
use celula_core::{CreateMemberInput, UpdateMemberInput};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{Created, MemberResponse, MessageResponse, list, message},
};

/// All members.
async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<MemberResponse>>> {
    Ok(list(state.member_service.list().await?))
}

/// Members not attached to any cell.
async fn list_without_cell(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MemberResponse>>> {
    Ok(list(state.member_service.list_without_cell().await?))
}

/// One member.
async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MemberResponse>> {
    Ok(Json(state.member_service.get(id).await?.into()))
}

/// Create a member on behalf of someone.
async fn create_member(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMemberInput>,
) -> AppResult<Created<MemberResponse>> {
    let member = state.member_service.create(&actor, input).await?;
    Ok(Created(member.into()))
}

/// Edit a member.
async fn update_member(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateMemberInput>,
) -> AppResult<Json<MemberResponse>> {
    let member = state.member_service.update(&actor, id, input).await?;
    Ok(Json(member.into()))
}

/// Delete a member and everything they own.
async fn delete_member(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.member_service.delete(&actor, id).await?;
    Ok(message("Membro excluído com sucesso"))
}

/// Member administration routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/sem-celula", get(list_without_cell))
        .route(
            "/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
}
