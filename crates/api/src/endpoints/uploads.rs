//! Multipart upload endpoints.

use axum::{
    Router,
    extract::{Multipart, Path, State},
    routing::post,
};
use celula_common::{AppError, AppResult};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
};

/// Public URL of a stored file.
#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Result of a profile photo upload.
#[derive(Serialize)]
pub struct PhotoResponse {
    pub mensagem: &'static str,
    pub foto_url: String,
}

/// Read the multipart field called `field_name` as `(file name, bytes)`.
async fn read_file(multipart: &mut Multipart, field_name: &str) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .to_vec();
        return Ok((file_name, data));
    }

    Err(AppError::BadRequest("Nenhum arquivo enviado".to_string()))
}

/// Generic upload for event banners and stories.
async fn upload(
    AuthUser(_actor): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let (file_name, data) = read_file(&mut multipart, "file").await?;
    let stored = state.upload_service.upload(&file_name, &data).await?;
    Ok(Json(UploadResponse { url: stored.url }))
}

/// Upload a profile photo and attach it to the member.
async fn upload_photo(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Json<PhotoResponse>> {
    let (file_name, data) = read_file(&mut multipart, "foto").await?;
    let (member, stored) = state
        .upload_service
        .upload_member_photo(&actor, id, &file_name, &data)
        .await?;

    Ok(Json(PhotoResponse {
        mensagem: "Foto atualizada",
        foto_url: member.photo_url.unwrap_or(stored.url),
    }))
}

/// Upload routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/upload_foto/{id}", post(upload_photo))
}
