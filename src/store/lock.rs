//! store::lock
//!
//! Exclusive repository lock for mutating operations.
//!
//! # Architecture
//!
//! The repository is single-writer: every mutating operation (stage,
//! commit, branch create/update, switch, merge) holds the lock for its
//! duration. Readers (log, branch listing) proceed without it, since all
//! visible state transitions are atomic renames.
//!
//! # Invariants
//!
//! - Lock acquisition is non-blocking (fails fast if another process
//!   holds it)
//! - The lock is released on drop (RAII), including on panic

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::RepoPaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("repository is locked by another stratum process")]
    AlreadyLocked,

    /// Failed to create or open the lock file.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on the repository.
///
/// Released automatically when dropped.
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl RepoLock {
    /// Attempt to acquire the repository lock.
    ///
    /// Uses OS-level advisory file locking via `fs2`, which works across
    /// processes. Non-blocking: if another process holds the lock this
    /// returns [`LockError::AlreadyLocked`] immediately.
    pub fn acquire(paths: &RepoPaths) -> Result<Self, LockError> {
        let path = paths.lock_path();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e)))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Whether this guard still holds the lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path to the lock file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            // Unlock errors on drop are unreportable; the OS releases the
            // lock when the descriptor closes regardless.
            let _ = fs2::FileExt::unlock(&file);
        }
    }
}
