//! Directory-backed store for local runs and tests.
//!
//! Object keys map directly to paths under a root directory, so a local run
//! leaves the same `date=YYYY-MM-DD` layout on disk that MinIO would hold.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{CleanError, CleanResult};
use crate::store::ObjectStore;

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn get(&self, key: &str) -> CleanResult<Vec<u8>> {
        match std::fs::read(self.root.join(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CleanError::NotFound(key.to_string())),
            Err(e) => Err(CleanError::storage(key, e)),
        }
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> CleanResult<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CleanError::storage(key, e))?;
        }
        std::fs::write(&path, bytes).map_err(|e| CleanError::storage(key, e))
    }

    async fn delete(&self, key: &str) -> CleanResult<()> {
        match std::fs::remove_file(self.root.join(key)) {
            Ok(()) => Ok(()),
            // Deleting an absent object is a no-op, same as S3.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CleanError::storage(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store
            .put("cleaned/date=2025-01-06/a.csv", b"x,y\n1,2\n".to_vec(), "text/csv")
            .await
            .unwrap();
        let bytes = store.get("cleaned/date=2025-01-06/a.csv").await.unwrap();
        assert_eq!(bytes, b"x,y\n1,2\n");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let err = store.get("nope/missing.csv").await.unwrap_err();
        assert!(matches!(err, CleanError::NotFound(_)));
        assert!(err.to_string().contains("nope/missing.csv"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.put("k", b"old".to_vec(), "text/csv").await.unwrap();
        store.put("k", b"new".to_vec(), "text/csv").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.put("k", b"v".to_vec(), "text/csv").await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(matches!(store.get("k").await, Err(CleanError::NotFound(_))));
    }
}
