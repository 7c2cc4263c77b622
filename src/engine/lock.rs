//! engine::lock
//!
//! Exclusive lock for checksum-store commits.
//!
//! # Architecture
//!
//! The store lock ensures only one process replaces the checksum snapshot
//! at a time. Two compilation runs racing on the same site directory would
//! otherwise interleave temp-file writes and renames.
//!
//! # Storage
//!
//! - `<store path>.lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock is held for the whole temp-write-then-rename sequence
//! - The lock is automatically released on drop (RAII pattern)
//! - Acquisition is non-blocking (fails fast if locked)

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("checksum store is locked by another process")]
    AlreadyLocked,

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock guarding the checksum-store snapshot.
///
/// Released when dropped, so the lock cannot outlive a failed commit.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl StoreLock {
    /// Attempt to acquire the lock for a store file.
    ///
    /// Uses OS-level file locking via `fs2`, which works across processes.
    /// Non-blocking: if another process holds the lock this returns
    /// [`LockError::AlreadyLocked`] immediately.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(store_path: &Path) -> Result<Self, LockError> {
        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let path = lock_path(store_path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// Called automatically on drop; explicit release lets callers surface
    /// release errors instead of swallowing them.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

/// Lock file path for a store file.
fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    store_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &Path) -> PathBuf {
        dir.join("checksums.json")
    }

    #[test]
    fn acquire_succeeds() {
        let temp = TempDir::new().unwrap();
        let lock = StoreLock::acquire(&store_path(temp.path())).unwrap();
        assert!(lock.is_held());
        assert!(lock.path().exists());
    }

    #[test]
    fn lock_file_sits_next_to_store() {
        let temp = TempDir::new().unwrap();
        let lock = StoreLock::acquire(&store_path(temp.path())).unwrap();
        assert_eq!(lock.path(), temp.path().join("checksums.json.lock"));
    }

    #[test]
    fn creates_missing_parent_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("cache").join("checksums.json");
        let lock = StoreLock::acquire(&nested).unwrap();
        assert!(lock.is_held());
    }

    #[test]
    fn prevents_second_acquire() {
        let temp = TempDir::new().unwrap();
        let path = store_path(temp.path());

        let lock1 = StoreLock::acquire(&path).unwrap();
        assert!(lock1.is_held());

        let result = StoreLock::acquire(&path);
        assert!(matches!(result, Err(LockError::AlreadyLocked)));
    }

    #[test]
    fn released_on_drop() {
        let temp = TempDir::new().unwrap();
        let path = store_path(temp.path());

        {
            let lock = StoreLock::acquire(&path).unwrap();
            assert!(lock.is_held());
        }

        let lock2 = StoreLock::acquire(&path).unwrap();
        assert!(lock2.is_held());
    }

    #[test]
    fn released_explicitly() {
        let temp = TempDir::new().unwrap();
        let path = store_path(temp.path());

        let mut lock = StoreLock::acquire(&path).unwrap();
        lock.release().unwrap();
        assert!(!lock.is_held());

        let lock2 = StoreLock::acquire(&path).unwrap();
        assert!(lock2.is_held());
    }

    #[test]
    fn multiple_release_calls_are_safe() {
        let temp = TempDir::new().unwrap();
        let mut lock = StoreLock::acquire(&store_path(temp.path())).unwrap();

        lock.release().unwrap();
        lock.release().unwrap();
        assert!(!lock.is_held());
    }

    #[test]
    fn error_display_formatting() {
        let err = LockError::AlreadyLocked;
        assert!(err.to_string().contains("locked"));

        let err = LockError::CreateFailed("test".into());
        assert!(err.to_string().contains("create"));
    }
}
