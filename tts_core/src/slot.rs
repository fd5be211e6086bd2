//! Single-slot store for the most recently synthesized reply.
//!
//! Exactly one artifact is kept on disk at a time. Every successful `put`
//! replaces the previous file (last writer wins); `get` always serves the
//! current one. A process restart starts from an empty slot again, files
//! left behind by a previous run are not picked up.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("failed to write audio to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read audio from {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Monotonic counter identifying one successful `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotVersion(pub u64);

#[derive(Debug)]
struct StoredAudio {
    path: PathBuf,
    version: SlotVersion,
}

#[derive(Debug)]
pub struct AudioSlot {
    dir: PathBuf,
    // Guards replacement and reads together so a reader never races a delete.
    current: Mutex<Option<StoredAudio>>,
    next_version: AtomicU64,
}

impl AudioSlot {
    /// Create an empty slot storing its artifacts under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            current: Mutex::new(None),
            next_version: AtomicU64::new(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `audio` as the current artifact and delete the previous one.
    ///
    /// The new file is fully written before the old one is removed, so a
    /// failed write leaves the previous artifact in place.
    pub async fn put(&self, audio: &[u8]) -> Result<SlotVersion, SlotError> {
        let mut current = self.current.lock().await;

        let path = self.dir.join(format!("reply-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, audio)
            .await
            .map_err(|source| SlotError::Write {
                path: path.clone(),
                source,
            })?;

        if let Some(previous) = current.take() {
            match tokio::fs::remove_file(&previous.path).await {
                Ok(()) => debug!(path = %previous.path.display(), "removed previous audio"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %previous.path.display(), "could not remove previous audio: {e}"),
            }
        }

        let version = SlotVersion(self.next_version.fetch_add(1, Ordering::Relaxed));
        debug!(path = %path.display(), version = version.0, bytes = audio.len(), "audio slot replaced");
        *current = Some(StoredAudio { path, version });
        Ok(version)
    }

    /// Bytes of the current artifact, or `None` when the slot is empty or
    /// its file is gone from disk.
    pub async fn get(&self) -> Result<Option<Vec<u8>>, SlotError> {
        let current = self.current.lock().await;
        let Some(stored) = current.as_ref() else {
            return Ok(None);
        };

        match tokio::fs::read(&stored.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %stored.path.display(), "current audio file disappeared");
                Ok(None)
            }
            Err(source) => Err(SlotError::Read {
                path: stored.path.clone(),
                source,
            }),
        }
    }

    pub async fn current_path(&self) -> Option<PathBuf> {
        self.current.lock().await.as_ref().map(|s| s.path.clone())
    }

    pub async fn version(&self) -> Option<SlotVersion> {
        self.current.lock().await.as_ref().map(|s| s.version)
    }
}
