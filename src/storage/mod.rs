//! Storage backends
//!
//! Exported documents are persisted through the [`StorageBackend`] trait so the
//! writer can target the local filesystem or an in-memory store with the same
//! all-or-nothing logic.

pub mod filesystem;
pub mod memory;

pub use filesystem::FileSystemStorageBackend;
pub use memory::MemoryStorageBackend;

use std::path::{Path, PathBuf};

/// Error raised by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("Path escapes storage root: {0}")]
    PathEscapesRoot(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Synchronous file storage used by the export writer
pub trait StorageBackend {
    /// Create or replace a file with the given content
    fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), StorageError>;

    fn file_exists(&self, path: &Path) -> Result<bool, StorageError>;

    fn dir_exists(&self, path: &Path) -> Result<bool, StorageError>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;

    /// Move a file, replacing the destination if it exists
    fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError>;

    fn remove_file(&self, path: &Path) -> Result<(), StorageError>;
}
