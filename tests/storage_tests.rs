use ayzek_backend::storage::{
    LocalDiskStorage, MockStorageService, PUBLIC_PREFIX, StorageError, StorageService,
};
use std::path::PathBuf;
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ayzek-uploads-{}", Uuid::new_v4()))
}

#[cfg(test)]
mod disk_tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_path() {
        let root = scratch_dir();
        let dir = root.join("public").join("uploads");
        let storage = LocalDiskStorage::new(&dir);

        storage.ensure_dir_exists().await.unwrap();
        assert!(dir.is_dir());

        // Idempotent
        storage.ensure_dir_exists().await.unwrap();

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_each_save_gets_a_fresh_name() {
        let dir = scratch_dir();
        let storage = LocalDiskStorage::new(&dir);

        let first = storage.save(Some("poster.jpg"), b"one").await.unwrap();
        let second = storage.save(Some("poster.jpg"), b"two").await.unwrap();
        assert_ne!(first, second);

        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_name_stays_inside_dir() {
        let dir = scratch_dir();
        let storage = LocalDiskStorage::new(&dir);

        let url = storage.save(Some("../../outside.png"), b"png").await.unwrap();
        let name = url.strip_prefix(&format!("{PUBLIC_PREFIX}/")).unwrap();

        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
        assert!(dir.join(name).is_file());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let dir = scratch_dir();
        let storage = LocalDiskStorage::new(&dir);

        let result = storage.save(Some("script.exe"), b"MZ").await;
        assert!(matches!(result, Err(StorageError::UnsupportedExtension(ext)) if ext == "exe"));

        let result = storage.save(Some("empty.png"), b"").await;
        assert!(matches!(result, Err(StorageError::Empty)));

        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_only_inside_dir() {
        let dir = scratch_dir();
        let storage = LocalDiskStorage::new(&dir);

        let url = storage.save(Some("poster.png"), b"png").await.unwrap();
        let name = url.strip_prefix(&format!("{PUBLIC_PREFIX}/")).unwrap().to_string();
        assert!(dir.join(&name).is_file());

        storage.remove(&url).await.unwrap();
        assert!(!dir.join(&name).exists());

        // Already gone, foreign or escaping URLs are all quiet no-ops.
        storage.remove(&url).await.unwrap();
        storage.remove("https://cdn.ayzek.org/poster.png").await.unwrap();
        storage.remove(&format!("{PUBLIC_PREFIX}/../../Cargo.toml")).await.unwrap();
        assert!(std::path::Path::new("Cargo.toml").is_file());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let mock = MockStorageService::new();
        let url = mock.save(Some("Team Photo.JPEG"), b"jpeg").await.unwrap();

        assert!(url.starts_with(PUBLIC_PREFIX));
        assert!(url.ends_with(".jpeg"));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockStorageService::new_failing();
        let result = mock.save(Some("photo.png"), b"png").await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_mock_records_removals() {
        let mock = MockStorageService::new();
        let url = mock.save(Some("photo.png"), b"png").await.unwrap();

        mock.remove(&url).await.unwrap();
        assert_eq!(mock.removed(), vec![url]);
    }

    #[tokio::test]
    async fn test_mock_applies_extension_rules() {
        let mock = MockStorageService::new();
        assert!(mock.save(Some("notes.txt"), b"text").await.is_err());
        assert!(mock.save(None, b"raw").await.unwrap().ends_with(".jpg"));
    }
}
