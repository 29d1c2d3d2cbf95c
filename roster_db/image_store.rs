//! Filesystem-backed [`ImageStore`]: one flat directory, files named `<uuid>.<ext>`.

use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use roster_app::images::ImageStore;
use roster_types::errors::ApplicationError;

#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Opens the store, creating its directory when missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!("Image store ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only plain names produced by `save` resolve; anything that could
    /// escape the directory does not.
    fn path_of(&self, filename: &str) -> Option<PathBuf> {
        let plain = !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains(['/', '\\', '\0']);
        plain.then(|| self.root.join(filename))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<String, ApplicationError> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        if let Err(e) = tokio::fs::write(self.root.join(&filename), bytes).await {
            tracing::error!("Failed to write image {}: {}", filename, e);
            return Err(e.into());
        }
        Ok(filename)
    }

    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let Some(path) = self.path_of(filename) else {
            tracing::warn!("Refusing to read image outside the store: {}", filename);
            return Ok(None);
        };

        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::error!("Failed to read image {}: {}", filename, e);
                Err(e.into())
            }
        }
    }

    async fn remove(&self, filename: &str) -> Result<(), ApplicationError> {
        let path = self.path_of(filename).ok_or_else(|| {
            ApplicationError::Infrastructure(format!("invalid image filename '{filename}'"))
        })?;

        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!("Removed image {}", filename);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::open(dir.path()).await.unwrap();

        let filename = store.save(vec![1, 2, 3], "jpg").await.unwrap();
        assert!(filename.ends_with(".jpg"));
        assert!(dir.path().join(&filename).exists());
        assert_eq!(store.load(&filename).await.unwrap(), Some(vec![1, 2, 3]));

        store.remove(&filename).await.unwrap();
        assert!(!dir.path().join(&filename).exists());
        assert_eq!(store.load(&filename).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads").join("players");

        let store = FsImageStore::open(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(store.root(), nested.as_path());
    }

    #[tokio::test]
    async fn test_removing_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::open(dir.path()).await.unwrap();

        assert!(store.remove("not-there.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_names_outside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::open(dir.path().join("store")).await.unwrap();
        tokio::fs::write(dir.path().join("secret.txt"), b"secret")
            .await
            .unwrap();

        assert_eq!(store.load("../secret.txt").await.unwrap(), None);
        assert!(store.remove("../secret.txt").await.is_err());
        assert!(dir.path().join("secret.txt").exists());
    }
}
