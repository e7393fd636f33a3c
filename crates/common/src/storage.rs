//! Local disk storage for uploaded files.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Stored file metadata.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// File name inside the upload directory.
    pub key: String,
    /// Relative URL the file is served under.
    pub url: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file under `key`.
    async fn store(&self, key: &str, data: &[u8]) -> AppResult<StoredFile>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self { base_path, base_url }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn store(&self, key: &str, data: &[u8]) -> AppResult<StoredFile> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;

        let path = self.base_path.join(key);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Stored upload");

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace become a single `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed, segments made only of dots (`..`) are dropped and
/// leading/trailing dots and underscores are trimmed, so the result can
/// never escape the upload directory.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let flattened: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let cleaned: String = flattened
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    cleaned
        .split('_')
        .filter(|segment| !segment.is_empty() && !segment.chars().all(|c| c == '.'))
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Build the stored name for an upload: `{prefix}_{timestamp}_{original}`.
///
/// Only the client-supplied part is sanitized; an original that sanitizes
/// to nothing leaves `{prefix}_{timestamp}`.
#[must_use]
pub fn upload_file_name(prefix: &str, timestamp: i64, original: &str) -> String {
    let original = sanitize_filename(original);
    if original.is_empty() {
        format!("{prefix}_{timestamp}")
    } else {
        format!("{prefix}_{timestamp}_{original}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\boot.ini"), "boot.ini");
    }

    #[test]
    fn test_sanitize_spaces_and_unicode() {
        assert_eq!(sanitize_filename("foto da célula.png"), "foto_da_clula.png");
        assert_eq!(sanitize_filename("  retiro 2024 .jpg "), "retiro_2024_.jpg");
    }

    #[test]
    fn test_sanitize_rejects_everything() {
        assert_eq!(sanitize_filename("çãõ"), "");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_upload_file_name_prefix() {
        let name = upload_file_name("user_7", 1_700_000_000, "minha foto.jpg");
        assert_eq!(name, "user_7_1700000000_minha_foto.jpg");
    }

    #[test]
    fn test_upload_file_name_drops_parent_segments() {
        let name = upload_file_name("upload", 1_700_000_000, "../../minha foto.png");
        assert_eq!(name, "upload_1700000000_minha_foto.png");

        let name = upload_file_name("upload", 1_700_000_000, "a/../b.png");
        assert_eq!(name, "upload_1700000000_a_b.png");
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_upload_file_name_without_usable_original() {
        assert_eq!(upload_file_name("user_3", 42, "çãõ"), "user_3_42");
    }

    #[test]
    fn test_public_url_joins() {
        let storage = LocalStorage::new(PathBuf::from("/tmp"), "/uploads/".to_string());
        assert_eq!(storage.public_url("a.png"), "/uploads/a.png");
    }

    #[tokio::test]
    async fn test_store_writes_under_base_path() {
        let dir = std::env::temp_dir().join(format!("celula-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/uploads".to_string());

        let stored = storage.store("upload_1_a.txt", b"hello").await.unwrap();
        assert_eq!(stored.url, "/uploads/upload_1_a.txt");
        assert_eq!(stored.key, "upload_1_a.txt");
        assert_eq!(std::fs::read(dir.join("upload_1_a.txt")).unwrap(), b"hello");

        let _ = std::fs::remove_dir_all(dir);
    }
}
