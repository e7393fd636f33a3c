//! School and study catalog endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, put},
};
use celula_common::AppResult;
use celula_core::{CreateSchoolInput, CreateStudyInput, UpdateSchoolInput};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{Created, MessageResponse, SchoolResponse, StudyResponse, list, message},
};

/// All schools.
async fn list_schools(State(state): State<AppState>) -> AppResult<Json<Vec<SchoolResponse>>> {
    Ok(list(state.catalog_service.list_schools().await?))
}

/// Add a school to the catalog.
async fn create_school(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSchoolInput>,
) -> AppResult<Created<SchoolResponse>> {
    let school = state.catalog_service.create_school(&actor, input).await?;
    Ok(Created(school.into()))
}

/// One school.
async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<SchoolResponse>> {
    Ok(Json(state.catalog_service.get_school(id).await?.into()))
}

/// Rename or edit a school.
async fn update_school(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateSchoolInput>,
) -> AppResult<Json<SchoolResponse>> {
    let school = state
        .catalog_service
        .update_school(&actor, id, input)
        .await?;
    Ok(Json(school.into()))
}

/// Remove a school.
async fn delete_school(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.catalog_service.delete_school(&actor, id).await?;
    Ok(message("Escola removida"))
}

/// Cell study material, newest first.
async fn list_studies(State(state): State<AppState>) -> AppResult<Json<Vec<StudyResponse>>> {
    Ok(list(state.catalog_service.list_studies().await?))
}

/// Publish a study.
async fn create_study(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStudyInput>,
) -> AppResult<Created<StudyResponse>> {
    let study = state.catalog_service.create_study(&actor, input).await?;
    Ok(Created(study.into()))
}

/// School and study catalog routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/escolas", get(list_schools).post(create_school))
        .route(
            "/escolas/{id}",
            put(update_school).get(get_school).delete(delete_school),
        )
        .route("/estudos", get(list_studies).post(create_study))
}
