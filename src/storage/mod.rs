use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::validate::FieldErrors;

/// MIME types accepted for image uploads.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Maximum image upload size (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum generic document upload size (50 MB).
pub const MAX_DOCUMENT_BYTES: usize = 50 * 1024 * 1024;

/// Maximum number of images in an activity gallery.
pub const MAX_GALLERY_IMAGES: usize = 10;

/// An uploaded file as received from a multipart form, before any validation
/// or storage has happened.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// The storage boundary: put bytes under a named folder and get a relative
/// path back, or delete a path. Delete is idempotent — removing a path that
/// is already gone succeeds.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, folder: &str, filename: &str, data: &[u8]) -> Result<String>;
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Stores files on the local disk under a configured root directory.
/// Returned paths are relative (e.g. `announcements/3f2a….jpg`) so the root
/// can move without rewriting records.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn store(&self, folder: &str, filename: &str, data: &[u8]) -> Result<String> {
        let folder_path = self.root.join(folder);
        fs::create_dir_all(&folder_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", folder, e)))?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), file_extension(filename));
        let file_path = folder_path.join(&stored_name);

        let mut file = fs::File::create(&file_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create file: {}", e)))?;
        file.write_all(data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {}", e)))?;

        Ok(format!("{}/{}", folder, stored_name))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let file_path = self.root.join(path);
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            // Already gone counts as success.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete {}: {}", path, e))),
        }
    }
}

/// A storage path owned by a record. Releasing it deletes the file, logging
/// rather than failing on storage errors so record housekeeping never blocks
/// on a missing or unwritable file.
#[derive(Debug)]
pub struct StoredFile(String);

impl StoredFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    pub async fn release(self, store: &dyn FileStore) {
        if let Err(e) = store.delete(&self.0).await {
            tracing::warn!(path = %self.0, "failed to remove stored file: {}", e);
        }
    }
}

/// Checks an image upload against the MIME allow-list and size cap,
/// recording failures under the given form field.
pub fn check_image(field: &str, file: &UploadedFile, errors: &mut FieldErrors) {
    let mime = file.content_type.as_deref().unwrap_or("");
    if !IMAGE_MIME_TYPES.contains(&mime) {
        errors.insert(field, "must be a jpeg, png, jpg, or webp image");
        return;
    }
    if file.data.len() > MAX_IMAGE_BYTES {
        errors.insert(field, "must be at most 5 MB");
    }
}

/// Checks a generic document upload against the 50 MB cap.
pub fn check_document(field: &str, file: &UploadedFile, errors: &mut FieldErrors) {
    if file.data.is_empty() {
        errors.insert(field, "is required");
        return;
    }
    if file.data.len() > MAX_DOCUMENT_BYTES {
        errors.insert(field, "must be at most 50 MB");
    }
}

/// Renders a byte count the way it is shown next to a download link:
/// "2.1 MB", "512 B", up to two decimals with trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let mut rendered = format!("{:.2}", size);
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    format!("{} {}", rendered, UNITS[unit])
}

fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str, len: usize) -> UploadedFile {
        UploadedFile {
            name: "photo.jpg".to_string(),
            content_type: Some(mime.to_string()),
            data: vec![0u8; len],
        }
    }

    #[test]
    fn file_sizes_render_like_the_site_shows_them() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2_202_009), "2.1 MB");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn image_rules_reject_oversize_and_wrong_type() {
        let mut errors = FieldErrors::new();
        check_image("image", &image("image/png", 100), &mut errors);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        check_image("image", &image("image/png", MAX_IMAGE_BYTES + 1), &mut errors);
        assert!(errors.get("image").is_some());

        let mut errors = FieldErrors::new();
        check_image("image", &image("application/pdf", 100), &mut errors);
        assert!(errors.get("image").is_some());
    }

    #[test]
    fn extensions_are_sanitized() {
        assert_eq!(file_extension("report.PDF"), "pdf");
        assert_eq!(file_extension("noext"), "noext");
        assert_eq!(file_extension("weird."), "bin");
        assert_eq!(file_extension("../../etc/passwd"), "bin");
    }

    #[tokio::test]
    async fn disk_delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskStore::new(dir.path());

        let path = store.store("gallery", "a.jpg", b"bytes").await.expect("store");
        assert!(dir.path().join(&path).exists());

        store.delete(&path).await.expect("first delete");
        store.delete(&path).await.expect("second delete");
        assert!(!dir.path().join(&path).exists());
    }
}
