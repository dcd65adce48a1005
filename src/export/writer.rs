//! All-or-nothing payload writer
//!
//! Payloads are first staged next to their final location as
//! `.<file name>.partial`, then renamed into place. A file the batch replaces
//! is moved aside to `.<file name>.bak` first and only deleted once every
//! payload is in place. Any failure removes the staged and newly placed files
//! and moves the set-aside files back, so a batch either fully replaces the
//! earlier output or leaves it as it was.

use super::serializer::Payload;
use crate::storage::{StorageBackend, StorageError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Target folder {target} is not usable: {source}")]
    TargetUnavailable {
        target: PathBuf,
        #[source]
        source: StorageError,
    },
    #[error("Target {0} exists and is not a folder")]
    TargetNotADirectory(PathBuf),
    #[error(
        "Writing {failed} failed after {committed} file(s) were committed; {}: {source}",
        rollback_outcome(.leftovers)
    )]
    Batch {
        failed: PathBuf,
        committed: usize,
        /// Files the rollback could not remove or restore
        leftovers: Vec<PathBuf>,
        #[source]
        source: StorageError,
    },
}

impl WriteError {
    /// Whether the target folder is back in its state before the batch
    pub fn rolled_back(&self) -> bool {
        match self {
            WriteError::Batch { leftovers, .. } => leftovers.is_empty(),
            WriteError::TargetUnavailable { .. } | WriteError::TargetNotADirectory(_) => true,
        }
    }
}

fn rollback_outcome(leftovers: &[PathBuf]) -> String {
    if leftovers.is_empty() {
        "batch rolled back".to_string()
    } else {
        let paths: Vec<String> = leftovers.iter().map(|p| p.display().to_string()).collect();
        format!("rollback incomplete, left {}", paths.join(", "))
    }
}

/// Paths of a successfully written batch, primary file first
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct WrittenFiles {
    files: Vec<PathBuf>,
}

impl WrittenFiles {
    /// The first file of the batch, `None` for an empty batch
    pub fn primary(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Where one payload lives during a batch
struct Slot {
    partial: PathBuf,
    backup: PathBuf,
    destination: PathBuf,
}

/// A destination touched by the commit phase
struct Committed<'a> {
    destination: &'a Path,
    backup: Option<&'a Path>,
    placed: bool,
}

/// Writes payload batches through a storage backend
pub struct StorageWriter<B: StorageBackend> {
    storage: B,
}

impl<B: StorageBackend> StorageWriter<B> {
    pub fn new(storage: B) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &B {
        &self.storage
    }

    /// Write all payloads into `target`, creating it if needed
    pub fn write_batch(&self, target: &Path, payloads: &[Payload]) -> Result<WrittenFiles, WriteError> {
        self.prepare_target(target)?;

        let plan: Vec<Slot> = payloads
            .iter()
            .map(|p| Slot {
                partial: target.join(format!(".{}.partial", p.file_name)),
                backup: target.join(format!(".{}.bak", p.file_name)),
                destination: target.join(&p.file_name),
            })
            .collect();

        for (index, (slot, payload)) in plan.iter().zip(payloads).enumerate() {
            if let Err(source) = self.storage.write_file(&slot.partial, &payload.bytes) {
                // A failed write may still leave a truncated file
                let leftovers = self.discard(plan[..=index].iter().map(|s| s.partial.as_path()));
                warn!("Staging {} failed, nothing written", slot.partial.display());
                return Err(WriteError::Batch {
                    failed: slot.partial.clone(),
                    committed: 0,
                    leftovers,
                    source,
                });
            }
            debug!("Staged {}", slot.partial.display());
        }

        let mut committed: Vec<Committed<'_>> = Vec::with_capacity(plan.len());
        for (index, slot) in plan.iter().enumerate() {
            let backup = match self.set_aside(slot) {
                Ok(backup) => backup,
                Err(source) => return Err(self.abort(slot, source, &committed, &plan[index..])),
            };
            let placed = self.storage.rename(&slot.partial, &slot.destination);
            committed.push(Committed {
                destination: &slot.destination,
                backup,
                placed: placed.is_ok(),
            });
            if let Err(source) = placed {
                return Err(self.abort(slot, source, &committed, &plan[index..]));
            }
        }

        for backup in committed.iter().filter_map(|c| c.backup) {
            if let Err(e) = self.storage.remove_file(backup) {
                warn!("Could not remove {}: {}", backup.display(), e);
            }
        }

        info!("Saved {} file(s) to {}", plan.len(), target.display());
        Ok(WrittenFiles {
            files: plan.iter().map(|slot| slot.destination.clone()).collect(),
        })
    }

    fn prepare_target(&self, target: &Path) -> Result<(), WriteError> {
        let unavailable = |source: StorageError| WriteError::TargetUnavailable {
            target: target.to_path_buf(),
            source,
        };
        if self.storage.dir_exists(target).map_err(unavailable)? {
            return Ok(());
        }
        if self.storage.file_exists(target).map_err(unavailable)? {
            return Err(WriteError::TargetNotADirectory(target.to_path_buf()));
        }
        self.storage.create_dir_all(target).map_err(unavailable)
    }

    /// Move an existing destination file to its backup path
    fn set_aside<'a>(&self, slot: &'a Slot) -> Result<Option<&'a Path>, StorageError> {
        if !self.storage.file_exists(&slot.destination)? {
            return Ok(None);
        }
        self.storage.rename(&slot.destination, &slot.backup)?;
        debug!("Set aside {}", slot.destination.display());
        Ok(Some(&slot.backup))
    }

    /// Undo the commit phase and build the error for the failed slot
    fn abort(
        &self,
        failed: &Slot,
        source: StorageError,
        committed: &[Committed<'_>],
        pending: &[Slot],
    ) -> WriteError {
        let mut leftovers = Vec::new();
        for entry in committed.iter().rev() {
            match (entry.backup, entry.placed) {
                (Some(backup), _) => {
                    if let Err(e) = self.storage.rename(backup, entry.destination) {
                        warn!("Could not restore {}: {}", entry.destination.display(), e);
                        leftovers.push(backup.to_path_buf());
                    }
                }
                (None, true) => {
                    leftovers.extend(self.discard(std::iter::once(entry.destination)));
                }
                (None, false) => {}
            }
        }
        leftovers.extend(self.discard(pending.iter().map(|s| s.partial.as_path())));

        let count = committed.iter().filter(|c| c.placed).count();
        warn!(
            "Committing {} failed, rolled back {} file(s)",
            failed.destination.display(),
            count
        );
        WriteError::Batch {
            failed: failed.destination.clone(),
            committed: count,
            leftovers,
            source,
        }
    }

    /// Remove the given files if present, returning those that could not be removed
    fn discard<'a>(&self, paths: impl Iterator<Item = &'a Path>) -> Vec<PathBuf> {
        let mut leftovers = Vec::new();
        for path in paths {
            if matches!(self.storage.file_exists(path), Ok(true))
                && let Err(e) = self.storage.remove_file(path)
            {
                warn!("Could not remove {}: {}", path.display(), e);
                leftovers.push(path.to_path_buf());
            }
        }
        leftovers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorageBackend;

    /// Memory backend failing on writes, renames or removals of matching paths
    struct FlakyBackend {
        inner: MemoryStorageBackend,
        fail_write_on: Option<String>,
        fail_rename_on: Option<String>,
        fail_remove_on: Option<String>,
    }

    impl FlakyBackend {
        fn new() -> Self {
            Self {
                inner: MemoryStorageBackend::new(),
                fail_write_on: None,
                fail_rename_on: None,
                fail_remove_on: None,
            }
        }

        fn denied(path: &Path) -> StorageError {
            StorageError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            )
        }

        fn matches(rule: &Option<String>, path: &Path) -> bool {
            rule.as_ref()
                .is_some_and(|name| path.to_string_lossy().ends_with(name.as_str()))
        }
    }

    impl StorageBackend for FlakyBackend {
        fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), StorageError> {
            if Self::matches(&self.fail_write_on, path) {
                return Err(Self::denied(path));
            }
            self.inner.write_file(path, content)
        }

        fn file_exists(&self, path: &Path) -> Result<bool, StorageError> {
            self.inner.file_exists(path)
        }

        fn dir_exists(&self, path: &Path) -> Result<bool, StorageError> {
            self.inner.dir_exists(path)
        }

        fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
            self.inner.create_dir_all(path)
        }

        fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
            if Self::matches(&self.fail_rename_on, to) {
                return Err(Self::denied(to));
            }
            self.inner.rename(from, to)
        }

        fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
            if Self::matches(&self.fail_remove_on, path) {
                return Err(Self::denied(path));
            }
            self.inner.remove_file(path)
        }
    }

    fn payloads() -> Vec<Payload> {
        ["api-docs.json", "pets.json", "stores.json"]
            .iter()
            .map(|name| Payload {
                file_name: name.to_string(),
                bytes: format!("{{\"name\":\"{}\"}}\n", name).into_bytes(),
            })
            .collect()
    }

    #[test]
    fn test_write_batch_commits_all_files() {
        let writer = StorageWriter::new(MemoryStorageBackend::new());
        let written = writer.write_batch(Path::new("out/docs"), &payloads()).unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(written.primary(), Some(Path::new("out/docs/api-docs.json")));
        assert_eq!(
            writer.storage().files(),
            vec![
                PathBuf::from("out/docs/api-docs.json"),
                PathBuf::from("out/docs/pets.json"),
                PathBuf::from("out/docs/stores.json"),
            ]
        );
    }

    #[test]
    fn test_staging_failure_leaves_nothing() {
        let mut backend = FlakyBackend::new();
        backend.fail_write_on = Some(".stores.json.partial".to_string());
        let writer = StorageWriter::new(backend);

        let err = writer.write_batch(Path::new("out"), &payloads()).unwrap_err();
        assert!(matches!(err, WriteError::Batch { committed: 0, .. }));
        assert!(writer.storage().inner.files().is_empty());
    }

    #[test]
    fn test_commit_failure_rolls_back_renamed_files() {
        let mut backend = FlakyBackend::new();
        backend.fail_rename_on = Some("pets.json".to_string());
        let writer = StorageWriter::new(backend);

        let err = writer.write_batch(Path::new("out"), &payloads()).unwrap_err();
        match err {
            WriteError::Batch {
                failed, committed, ..
            } => {
                assert_eq!(failed, PathBuf::from("out/pets.json"));
                assert_eq!(committed, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(writer.storage().inner.files().is_empty());
    }

    fn seed_earlier_export(backend: &MemoryStorageBackend) {
        backend.create_dir_all(Path::new("out")).unwrap();
        backend.write_file(Path::new("out/api-docs.json"), b"old listing").unwrap();
        backend.write_file(Path::new("out/pets.json"), b"old pets").unwrap();
    }

    #[test]
    fn test_commit_failure_restores_earlier_files() {
        let mut backend = FlakyBackend::new();
        seed_earlier_export(&backend.inner);
        backend.fail_rename_on = Some("stores.json".to_string());
        let writer = StorageWriter::new(backend);

        let err = writer.write_batch(Path::new("out"), &payloads()).unwrap_err();
        assert!(matches!(err, WriteError::Batch { committed: 2, .. }));
        assert!(err.rolled_back());
        assert!(err.to_string().contains("batch rolled back"));

        let storage = &writer.storage().inner;
        assert_eq!(
            storage.files(),
            vec![PathBuf::from("out/api-docs.json"), PathBuf::from("out/pets.json")]
        );
        assert_eq!(storage.read_to_string("out/api-docs.json").unwrap(), "old listing");
        assert_eq!(storage.read_to_string("out/pets.json").unwrap(), "old pets");
    }

    #[test]
    fn test_successful_batch_replaces_earlier_files_without_backups() {
        let backend = MemoryStorageBackend::new();
        seed_earlier_export(&backend);
        let writer = StorageWriter::new(backend);

        writer.write_batch(Path::new("out"), &payloads()).unwrap();

        let storage = writer.storage();
        assert_eq!(
            storage.files(),
            vec![
                PathBuf::from("out/api-docs.json"),
                PathBuf::from("out/pets.json"),
                PathBuf::from("out/stores.json"),
            ]
        );
        assert_eq!(
            storage.read_to_string("out/pets.json").unwrap(),
            "{\"name\":\"pets.json\"}\n"
        );
    }

    #[test]
    fn test_incomplete_rollback_is_reported() {
        let mut backend = FlakyBackend::new();
        backend.fail_rename_on = Some("stores.json".to_string());
        backend.fail_remove_on = Some("out/api-docs.json".to_string());
        let writer = StorageWriter::new(backend);

        let err = writer.write_batch(Path::new("out"), &payloads()).unwrap_err();
        assert!(!err.rolled_back());
        match &err {
            WriteError::Batch { leftovers, .. } => {
                assert_eq!(leftovers, &vec![PathBuf::from("out/api-docs.json")]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("rollback incomplete, left out/api-docs.json"));
    }

    #[test]
    fn test_target_that_is_a_file_is_rejected() {
        let backend = MemoryStorageBackend::new();
        backend.write_file(Path::new("taken"), b"x").unwrap();
        let writer = StorageWriter::new(backend);

        let err = writer.write_batch(Path::new("taken"), &payloads()).unwrap_err();
        assert!(matches!(err, WriteError::TargetNotADirectory(_)));
        assert_eq!(writer.storage().files(), vec![PathBuf::from("taken")]);
    }
}
