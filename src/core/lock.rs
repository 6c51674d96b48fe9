//! core::lock
//!
//! Exclusive lock on the metadata cache directory.
//!
//! # Architecture
//!
//! The cache lock ensures only one generator writes artifacts into a cache
//! directory at a time, across processes. Within one process, sharing goes
//! through [`crate::engine::SharedGenerator`].
//!
//! # Storage
//!
//! - `<cache_dir>/.lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - Lock is held for an entire `generate_for` call
//! - Lock is automatically released on drop (RAII pattern)
//!
//! # Example
//!
//! ```ignore
//! use serialmeta::core::lock::CacheLock;
//! use serialmeta::core::paths::CachePaths;
//!
//! let paths = CachePaths::new(PathBuf::from("var/cache/meta"));
//! let lock = CacheLock::acquire(&paths)?;
//!
//! // Write artifacts while holding the lock
//! // ...
//!
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::CachePaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("metadata cache is locked by another process")]
    AlreadyLocked,

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on a cache directory.
///
/// Released when dropped.
#[derive(Debug)]
pub struct CacheLock {
    path: PathBuf,
    file: Option<File>,
}

impl CacheLock {
    /// Acquire the cache lock, waiting for other holders to release it.
    ///
    /// Creates the cache directory if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &CachePaths) -> Result<Self, LockError> {
        let file = Self::open(paths)?;
        file.lock_exclusive()
            .map_err(|e| LockError::AcquireFailed(e.to_string()))?;
        Ok(Self {
            path: paths.lock_path(),
            file: Some(file),
        })
    }

    /// Try to acquire the lock without waiting.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another holder has the lock
    /// - [`LockError::CreateFailed`] / [`LockError::AcquireFailed`] as for
    ///   [`CacheLock::acquire`]
    pub fn try_acquire(paths: &CachePaths) -> Result<Self, LockError> {
        let file = Self::open(paths)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path: paths.lock_path(),
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    fn open(paths: &CachePaths) -> Result<File, LockError> {
        let dir = paths.cache_dir();
        fs::create_dir_all(dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let path = paths.lock_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e)))
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock before the guard goes out of scope.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
