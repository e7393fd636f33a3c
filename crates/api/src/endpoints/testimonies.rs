//! Testimony endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use celula_common::AppResult;
use celula_core::CreateTestimonyInput;

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{Created, MessageResponse, TestimonyResponse, list, message},
};

/// Testimonies of a cell.
async fn list_by_cell(
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
) -> AppResult<Json<Vec<TestimonyResponse>>> {
    Ok(list(state.testimony_service.list_by_cell(cell_id).await?))
}

/// Post a testimony to a cell.
async fn create_for_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
    Json(input): Json<CreateTestimonyInput>,
) -> AppResult<Created<TestimonyResponse>> {
    let testimony = state
        .testimony_service
        .create(&actor, cell_id, input)
        .await?;
    Ok(Created(testimony.into()))
}

/// Testimonies across the cells of a network or generation.
async fn list_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<TestimonyResponse>>> {
    Ok(list(
        state
            .testimony_service
            .feed(query.network_id(), query.generation_id())
            .await?,
    ))
}

/// Delete a testimony.
async fn delete_testimony(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.testimony_service.delete(&actor, id).await?;
    Ok(message("Testemunho removido"))
}

/// Testimony routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/celulas/{id}/testemunhos",
            get(list_by_cell).post(create_for_cell),
        )
        .route("/testemunhos", get(list_feed))
        .route("/testemunhos/{id}", delete(delete_testimony))
}
