//! Network, generation and cell endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use celula_common::AppResult;
use celula_core::{
    CreateCellInput, CreateGenerationInput, CreateNetworkInput, UpdateCellInput,
    UpdateGenerationInput, UpdateNetworkInput,
};

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{
        CellResponse, Created, GenerationResponse, MessageResponse, NetworkResponse, list,
        message,
    },
};

// ==================== Networks ====================

/// All networks.
async fn list_networks(State(state): State<AppState>) -> AppResult<Json<Vec<NetworkResponse>>> {
    Ok(list(state.hierarchy_service.list_networks().await?))
}

/// One network.
async fn get_network(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<NetworkResponse>> {
    Ok(Json(state.hierarchy_service.get_network(id).await?.into()))
}

/// Create a network.
async fn create_network(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNetworkInput>,
) -> AppResult<Created<NetworkResponse>> {
    let network = state.hierarchy_service.create_network(&actor, input).await?;
    Ok(Created(network.into()))
}

/// Edit a network.
async fn update_network(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateNetworkInput>,
) -> AppResult<Json<NetworkResponse>> {
    let network = state
        .hierarchy_service
        .update_network(&actor, id, input)
        .await?;
    Ok(Json(network.into()))
}

/// Delete a network; its generations, cells and members are detached.
async fn delete_network(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.hierarchy_service.delete_network(&actor, id).await?;
    Ok(message("Rede removida"))
}

// ==================== Generations ====================

/// Generations, optionally restricted to one network.
async fn list_generations(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<GenerationResponse>>> {
    Ok(list(
        state
            .hierarchy_service
            .list_generations(query.network_id())
            .await?,
    ))
}

/// One generation.
async fn get_generation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenerationResponse>> {
    Ok(Json(state.hierarchy_service.get_generation(id).await?.into()))
}

/// Create a generation.
async fn create_generation(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGenerationInput>,
) -> AppResult<Created<GenerationResponse>> {
    let generation = state
        .hierarchy_service
        .create_generation(&actor, input)
        .await?;
    Ok(Created(generation.into()))
}

/// Edit a generation.
async fn update_generation(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateGenerationInput>,
) -> AppResult<Json<GenerationResponse>> {
    let generation = state
        .hierarchy_service
        .update_generation(&actor, id, input)
        .await?;
    Ok(Json(generation.into()))
}

/// Delete a generation; its cells and members are detached.
async fn delete_generation(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.hierarchy_service.delete_generation(&actor, id).await?;
    Ok(message("Geração removida"))
}

// ==================== Cells ====================

/// Every cell with its hierarchy names and members.
async fn list_cells(State(state): State<AppState>) -> AppResult<Json<Vec<CellResponse>>> {
    Ok(list(state.hierarchy_service.list_cells().await?))
}

/// One cell.
async fn get_cell(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CellResponse>> {
    Ok(Json(state.hierarchy_service.get_cell(id).await?.into()))
}

/// Create a cell.
async fn create_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCellInput>,
) -> AppResult<Created<CellResponse>> {
    let cell = state.hierarchy_service.create_cell(&actor, input).await?;
    Ok(Created(cell.into()))
}

/// Edit a cell.
async fn update_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCellInput>,
) -> AppResult<Json<CellResponse>> {
    let cell = state.hierarchy_service.update_cell(&actor, id, input).await?;
    Ok(Json(cell.into()))
}

/// Delete a cell and its cell-level content.
async fn delete_cell(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.hierarchy_service.delete_cell(&actor, id).await?;
    Ok(message("Celula removida"))
}

/// Network, generation and cell routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/redes", get(list_networks).post(create_network))
        .route(
            "/redes/{id}",
            get(get_network).put(update_network).delete(delete_network),
        )
        .route("/geracoes", get(list_generations).post(create_generation))
        .route(
            "/geracoes/{id}",
            get(get_generation)
                .put(update_generation)
                .delete(delete_generation),
        )
        .route("/celulas", get(list_cells).post(create_cell))
        .route(
            "/celulas/{id}",
            get(get_cell).put(update_cell).delete(delete_cell),
        )
}
