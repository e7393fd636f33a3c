//! Prayer request endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use celula_common::AppResult;
use celula_core::CreatePrayerInput;

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{Created, MessageResponse, PrayerResponse, list, message},
};

/// Prayer requests of a cell.
async fn list_by_cell(
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
) -> AppResult<Json<Vec<PrayerResponse>>> {
    Ok(list(state.prayer_service.list_by_cell(cell_id).await?))
}

/// Post a prayer request to a cell.
async fn create_for_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
    Json(input): Json<CreatePrayerInput>,
) -> AppResult<Created<PrayerResponse>> {
    let request = state
        .prayer_service
        .create(&actor, cell_id, input)
        .await?;
    Ok(Created(request.into()))
}

/// Prayer requests across the cells of a network or generation.
async fn list_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<PrayerResponse>>> {
    Ok(list(
        state
            .prayer_service
            .feed(query.network_id(), query.generation_id())
            .await?,
    ))
}

/// Flip the resolved flag.
async fn resolve(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PrayerResponse>> {
    let request = state.prayer_service.toggle_resolved(&actor, id).await?;
    Ok(Json(request.into()))
}

/// Delete a prayer request.
async fn delete_request(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.prayer_service.delete(&actor, id).await?;
    Ok(message("Pedido removido"))
}

/// Prayer request routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/celulas/{id}/pedidos", get(list_by_cell).post(create_for_cell))
        .route("/pedidos", get(list_feed))
        .route("/pedidos/{id}/resolver", put(resolve))
        .route("/pedidos/{id}", delete(delete_request))
}
