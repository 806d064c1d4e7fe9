//! Durable storage for encoded session state.
//!
//! One flat directory, one file per session, path derived solely from the
//! session identifier. Access to a given path is serialized through a
//! process-wide lock registry so a concurrent reader never observes a
//! partially written file. Coordination is per-process only: independent
//! processes sharing the directory need external advisory locking.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::{FILE_PREFIX, SESSION_DIR};
use crate::error::{SessionError, SessionResult};

/// Session files are readable and writable by the owning user only.
const FILE_MODE: u32 = 0o600;

/// One lock per storage path, shared by every store handle in the process.
/// A lock created fresh per call would protect nothing. Entries are never
/// removed; the registry is bounded by the distinct identifiers this
/// process has touched.
static PATH_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    PATH_LOCKS
        .lock()
        .entry(path.to_path_buf())
        .or_default()
        .clone()
}

/// Storage file path for a session identifier.
pub fn session_path(id: &str) -> PathBuf {
    Path::new(SESSION_DIR).join(format!("{FILE_PREFIX}{id}"))
}

/// Filesystem persistence for encoded session state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    /// Create or truncate the file at `path` and write `bytes`, holding
    /// the path's lock for the duration of the write.
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> SessionResult<()> {
        let lock = lock_for(path);
        let _guard = lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(FILE_MODE)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!(path = ?path, size = bytes.len(), "Wrote session file");
        Ok(())
    }

    /// Read the full contents of the file at `path`.
    pub async fn read(&self, path: &Path) -> SessionResult<Vec<u8>> {
        let lock = lock_for(path);
        let _guard = lock.lock().await;

        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SessionError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the file at `path`.
    pub async fn delete(&self, path: &Path) -> SessionResult<()> {
        let lock = lock_for(path);
        let _guard = lock.lock().await;

        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = ?path, "Deleted session file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SessionError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a file exists at `path`.
    pub async fn exists(&self, path: &Path) -> SessionResult<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }
}
