//! Authentication and self-service account endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use celula_common::AppResult;
use celula_core::{ChangePasswordInput, RegisterInput, UpdateProfileInput};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{AuthenticatedMember, Created, MemberDetailsResponse, MemberResponse},
};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "senha", default)]
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
pub struct LoginResponse {
    pub mensagem: &'static str,
    pub usuario: MemberResponse,
    pub token: String,
}

/// Password change response; the old token stops working.
#[derive(Serialize)]
pub struct PasswordChangedResponse {
    pub mensagem: &'static str,
    pub token: String,
}

/// Sign in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let member = state
        .member_service
        .login(&req.email, &req.password)
        .await?;
    let AuthenticatedMember { member, token } = member.into();

    Ok(Json(LoginResponse {
        mensagem: "Login realizado com sucesso",
        usuario: member,
        token,
    }))
}

/// Create a new member account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Created<AuthenticatedMember>> {
    let member = state.member_service.register(input).await?;
    Ok(Created(member.into()))
}

/// The member with their cell, network and generation.
async fn my_data(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MemberDetailsResponse>> {
    let details = state.member_service.details(&actor, id).await?;
    Ok(Json(details.into()))
}

/// Edit the caller's own profile.
async fn update_profile(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<MemberResponse>> {
    let member = state.member_service.update_profile(&actor, id, input).await?;
    Ok(Json(member.into()))
}

/// Change the password and rotate the session token.
async fn change_password(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<Json<PasswordChangedResponse>> {
    let member = state
        .member_service
        .change_password(&actor, id, input)
        .await?;

    Ok(Json(PasswordChangedResponse {
        mensagem: "Senha alterada com sucesso",
        token: member.token.unwrap_or_default(),
    }))
}

/// Session and profile routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/meus-dados/{id}", get(my_data))
        .route("/update_profile/{id}", put(update_profile))
        .route("/change_password/{id}", put(change_password))
}
