use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::AppError;

/// Public URL prefix under which stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/public/uploads";

/// Extensions accepted for uploaded images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file type .{0} is not allowed")]
    UnsupportedExtension(String),
    #[error("uploaded file is empty")]
    Empty,
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedExtension(_) | StorageError::Empty => {
                AppError::BadRequest(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

// 1. StorageService Contract
/// StorageService
///
/// Where uploaded images end up. Handlers only depend on this trait, so tests
/// swap the disk for [`MockStorageService`].
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the upload directory if needed. Called once at startup.
    async fn ensure_dir_exists(&self) -> Result<(), StorageError>;

    /// Stores `bytes` under a fresh `<uuid>.<ext>` name derived from the
    /// client's file name and returns the public URL of the stored file.
    async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, StorageError>;

    /// Deletes a file previously returned by [`save`](Self::save). URLs
    /// outside [`PUBLIC_PREFIX`] and files already gone are not errors.
    async fn remove(&self, url: &str) -> Result<(), StorageError>;
}

/// sanitize_extension
///
/// Only the last extension of the client's file name is kept, lowercased.
/// Names without one fall back to `jpg`; anything outside
/// [`ALLOWED_EXTENSIONS`] is refused. Path components never reach the disk.
pub fn sanitize_extension(original_name: Option<&str>) -> Result<String, StorageError> {
    let file_name = original_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();

    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return Ok(DEFAULT_EXTENSION.to_string()),
    };

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::UnsupportedExtension(ext))
    }
}

fn stored_name(original_name: Option<&str>) -> Result<String, StorageError> {
    let ext = sanitize_extension(original_name)?;
    Ok(format!("{}.{ext}", Uuid::new_v4()))
}

// 2. The Real Implementation (local disk)
/// LocalDiskStorage
///
/// Writes uploads into a directory that the web server exposes under
/// [`PUBLIC_PREFIX`].
#[derive(Clone)]
pub struct LocalDiskStorage {
    dir: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    async fn ensure_dir_exists(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        let name = stored_name(original_name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        tracing::info!(file = %name, size = bytes.len(), "Stored upload");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        let Some(name) = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| Path::new(rest).file_name())
        else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                tracing::info!(url = %url, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// Accepts uploads without touching the disk. Applies the same name and
/// extension rules as [`LocalDiskStorage`].
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, every save fails as if the disk were unavailable.
    pub should_fail: bool,
    removed: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true, ..Self::default() }
    }

    /// URLs passed to [`StorageService::remove`], oldest first.
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_dir_exists(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable("mock storage failure".to_string()));
        }
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        Ok(format!("{PUBLIC_PREFIX}/{}", stored_name(original_name)?))
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        if let Ok(mut urls) = self.removed.lock() {
            urls.push(url.to_string());
        }
        Ok(())
    }
}

/// StorageState
///
/// The storage service as shared through the application state.
pub type StorageState = Arc<dyn StorageService>;
