//! Local filesystem storage backend

use super::{StorageBackend, StorageError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Storage backend writing to the local filesystem
///
/// A backend created with [`FileSystemStorageBackend::new`] resolves every path
/// relative to its root and rejects absolute paths or `..` components. The
/// [`FileSystemStorageBackend::unrestricted`] backend uses paths as given.
#[derive(Debug, Clone, Default)]
pub struct FileSystemStorageBackend {
    root: Option<PathBuf>,
}

impl FileSystemStorageBackend {
    /// Create a backend confined to `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    /// Create a backend that accepts any path
    pub fn unrestricted() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let Some(root) = &self.root else {
            return Ok(path.to_path_buf());
        };
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(StorageError::PathEscapesRoot(path.to_path_buf()));
        }
        Ok(root.join(path))
    }
}

impl StorageBackend for FileSystemStorageBackend {
    fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::write(&full, content).map_err(|e| StorageError::io(&full, e))
    }

    fn file_exists(&self, path: &Path) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.is_file())
    }

    fn dir_exists(&self, path: &Path) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.is_dir())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::create_dir_all(&full).map_err(|e| StorageError::io(&full, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        let full_from = self.resolve(from)?;
        let full_to = self.resolve(to)?;
        fs::rename(&full_from, &full_to).map_err(|e| StorageError::io(&full_to, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::remove_file(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
            _ => StorageError::io(&full, e),
        })
    }
}
