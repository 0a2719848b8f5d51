//! File-based persistence sink
//!
//! This module provides a file-backed [`ByteStore`]: one append-only file
//! per store name under a base directory, mirroring how the emulated
//! hardware keeps its log in a dedicated flash region.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace};

use tablog_core::{ByteStore, StoreError};

/// File-based implementation of [`ByteStore`]
///
/// Each store name maps to a file directly under the base directory. Names
/// are restricted to ASCII alphanumerics plus `-`, `_`, and `.` so they
/// cannot escape the base directory.
#[derive(Debug)]
pub struct FileByteStore {
    base_dir: PathBuf,
    /// Whether appends are synced to disk before returning
    sync_on_write: bool,
}

impl FileByteStore {
    /// Create a store rooted at the given directory, syncing every write
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_options(base_dir, true).await
    }

    /// Create a store with explicit durability behavior
    pub async fn with_options(
        base_dir: impl AsRef<Path>,
        sync_on_write: bool,
    ) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&base_dir).await?;

        info!(dir = %base_dir.display(), sync_on_write, "Opened file byte store");
        Ok(Self {
            base_dir,
            sync_on_write,
        })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::invalid_name(name));
        }

        Ok(self.base_dir.join(name))
    }
}

#[async_trait]
impl ByteStore for FileByteStore {
    async fn append(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        trace!(name, len = bytes.len(), "Appending to file");

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;

        if self.sync_on_write {
            file.sync_data().await?;
        }

        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(name, "Removed store file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_all(&self, name: &str) -> Result<Option<Bytes>, StoreError> {
        let path = self.path_for(name)?;

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
