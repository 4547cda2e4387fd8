//! Key/value storage behind reading preferences and other persisted state

use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read data stored under the key
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Write data under the key, replacing any previous value
    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()>;
}

/// Local filesystem storage provider
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the root, rejecting anything that escapes it
    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::BackendError(
                        "Path traversal attempt detected".to_string(),
                    ));
                }
            }
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(key)?;
        tokio::fs::read(full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::BackendError(e.to_string()),
        })
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        // Write beside the target then rename, so readers never see half a value
        let temp_path = full_path.with_extension("tmp");
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// In-memory storage provider (for tests and ephemeral sessions)
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data.write().await.insert(key.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        storage.write("prefs.json", b"{}".to_vec()).await.unwrap();
        assert_eq!(storage.read("prefs.json").await.unwrap(), b"{}");

        storage.write("prefs.json", b"[]".to_vec()).await.unwrap();
        assert_eq!(storage.read("prefs.json").await.unwrap(), b"[]");
        assert!(matches!(
            storage.read("missing.json").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write("nested/prefs.json", b"{\"theme\":\"dark\"}".to_vec())
            .await
            .unwrap();
        let data = storage.read("nested/prefs.json").await.unwrap();
        assert_eq!(data, b"{\"theme\":\"dark\"}");
        assert!(!dir.path().join("nested/prefs.tmp").exists());
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(storage.read("../etc/passwd").await.is_err());
        assert!(storage.write("/abs", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_local_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(matches!(
            storage.read("absent.json").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
