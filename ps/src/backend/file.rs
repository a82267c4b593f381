//! Directory-backed backend
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temp file that is
//! renamed over the target while an exclusive lock on `<dir>/.lock` is held,
//! so readers never see a half-written collection.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, info};

use super::Backend;
use crate::error::{StoreError, StoreResult};

/// Name of the advisory lock file inside the data directory
const LOCK_FILE: &str = ".lock";

/// Backend persisting each key as a JSON file in a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open or create a file backend rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "Opened file backend");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    async fn locked<F>(&self, op: F) -> StoreResult<()>
    where
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        let lock_path = self.dir.join(LOCK_FILE);
        tokio::task::spawn_blocking(move || {
            let lock = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            FileExt::lock_exclusive(&lock)?;
            let result = op();
            FileExt::unlock(&lock)?;
            result
        })
        .await
        .map_err(|e| StoreError::Io(io::Error::other(e)))?
        .map_err(StoreError::Io)
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(%key, "read: key absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: String) -> StoreResult<()> {
        debug!(%key, bytes = value.len(), "write: called");
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        self.locked(move || {
            std::fs::write(&tmp, value)?;
            std::fs::rename(&tmp, &path)
        })
        .await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(%key, "remove: called");
        let path = self.path_for(key);
        self.locked(move || match std::fs::remove_file(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }
}
