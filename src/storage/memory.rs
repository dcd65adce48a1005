//! In-memory storage backend
//!
//! Useful for embedding the exporter where no filesystem is available and for
//! inspecting exported content in tests.

use super::{StorageBackend, StorageError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

/// Storage backend keeping files in a map
#[derive(Debug, Default)]
pub struct MemoryStorageBackend {
    state: Mutex<MemoryState>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Paths of all stored files, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        self.state().files.keys().cloned().collect()
    }

    /// Content of a stored file as UTF-8 text
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl StorageBackend for MemoryStorageBackend {
    fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), StorageError> {
        let mut state = self.state();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !state.dirs.contains(parent)
        {
            return Err(StorageError::NotFound(parent.to_path_buf()));
        }
        state.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> Result<bool, StorageError> {
        Ok(self.state().files.contains_key(path))
    }

    fn dir_exists(&self, path: &Path) -> Result<bool, StorageError> {
        Ok(self.state().dirs.contains(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let mut state = self.state();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        let mut state = self.state();
        let content = state
            .files
            .remove(from)
            .ok_or_else(|| StorageError::NotFound(from.to_path_buf()))?;
        state.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        self.state()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }
}
