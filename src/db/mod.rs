//! File-backed persistence.
//!
//! Each collection lives in a single JSON array file. The file is the source of
//! truth: every operation reads it in full and every mutation rewrites it in full.
//! Rewrites go to a sibling temp file that is renamed over the collection, so a
//! reader sees either the old array or the new one.

mod repository;

pub use repository::*;

use std::fmt;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Storage failure for a single collection file.
#[derive(Debug)]
pub enum StoreError {
    /// The file or its directory could not be read or created
    Read { path: PathBuf, source: std::io::Error },
    /// The file does not hold a valid JSON array of records
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The collection could not be serialized or written
    Write { path: PathBuf, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            StoreError::Corrupt { path, source } => {
                write!(f, "corrupt collection file {}: {}", path.display(), source)
            }
            StoreError::Write { path, message } => {
                write!(f, "failed to write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::Corrupt { source, .. } => Some(source),
            StoreError::Write { .. } => None,
        }
    }
}

/// A JSON array of `T` persisted at one path.
///
/// Reads never lock. Read-modify-write cycles go through [`RecordStore::update`],
/// which serializes writers within this process.
#[derive(Debug)]
pub struct RecordStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Read the whole collection, creating an empty file first if needed.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        self.ensure_file().await?;
        read_array(&self.path).await
    }

    /// Replace the file with `records`.
    pub async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let temp = self.write_temp(&json).await.map_err(|e| self.write_error(e))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            discard(&temp).await;
            return Err(self.write_error(e));
        }
        Ok(())
    }

    /// Load, apply `mutate`, and save when it asks to, all under the write lock.
    ///
    /// `mutate` returns the value to hand back plus whether the collection changed.
    /// Unchanged collections are not rewritten.
    pub async fn update<R, E, F>(&self, mutate: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<(R, bool), E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let (result, changed) = mutate(&mut records)?;
        if changed {
            self.save(&records).await?;
        }
        Ok(result)
    }

    async fn ensure_file(&self) -> Result<(), StoreError> {
        let read_error = |source| StoreError::Read {
            path: self.path.clone(),
            source,
        };

        if tokio::fs::try_exists(&self.path).await.map_err(read_error)? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(read_error)?;
        }

        // Linking fails if another task created the file first, so its content wins.
        let temp = self.write_temp(b"[]").await.map_err(read_error)?;
        let linked = tokio::fs::hard_link(&temp, &self.path).await;
        discard(&temp).await;
        match linked {
            Ok(()) => {
                tracing::info!("Initialized empty collection at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(read_error(e)),
        }
    }

    /// Write `bytes` to a fresh file next to the collection and flush it to disk.
    async fn write_temp(&self, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = self.path.with_file_name(format!(
            ".{}.{}.{}.tmp",
            name,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let written = async {
            let mut file = tokio::fs::File::create(&temp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;

        match written {
            Ok(()) => Ok(temp),
            Err(e) => {
                discard(&temp).await;
                Err(e)
            }
        }
    }

    fn write_error(&self, err: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

async fn discard(temp: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("Failed to remove temp file {}: {}", temp.display(), e);
        }
    }
}

/// Parse the JSON array stored at `path` without creating anything.
pub(crate) async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
