//! File uploads and profile photos.

use std::sync::Arc;

use celula_common::{AppError, AppResult, StorageBackend, StoredFile, upload_file_name};
use celula_db::entities::member;
use chrono::Utc;

use super::access::ensure_self_or_leader;
use super::member::MemberService;

/// Maximum upload size (16MB).
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Service storing uploaded files in the configured backend.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageBackend>,
    member_service: MemberService,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, member_service: MemberService) -> Self {
        Self {
            storage,
            member_service,
        }
    }

    /// Store a generic upload, named `upload_{timestamp}_{original}`.
    pub async fn upload(&self, file_name: &str, data: &[u8]) -> AppResult<StoredFile> {
        self.store("upload", file_name, data).await
    }

    /// Store a profile photo and point the member at it.
    pub async fn upload_member_photo(
        &self,
        actor: &member::Model,
        member_id: i32,
        file_name: &str,
        data: &[u8],
    ) -> AppResult<(member::Model, StoredFile)> {
        ensure_self_or_leader(actor, member_id)?;
        self.member_service.get(member_id).await?;

        let stored = self.store(&format!("user_{member_id}"), file_name, data).await?;
        let member = self
            .member_service
            .set_photo(actor, member_id, stored.url.clone())
            .await?;

        tracing::info!(member_id, key = %stored.key, "Updated profile photo");
        Ok((member, stored))
    }

    async fn store(&self, prefix: &str, file_name: &str, data: &[u8]) -> AppResult<StoredFile> {
        if file_name.trim().is_empty() {
            return Err(AppError::BadRequest("Nenhum arquivo selecionado".to_string()));
        }
        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::BadRequest(format!(
                "Arquivo maior que {} MB",
                MAX_UPLOAD_SIZE / (1024 * 1024)
            )));
        }

        let key = upload_file_name(prefix, Utc::now().timestamp(), file_name);
        self.storage.store(&key, data).await
    }
}
