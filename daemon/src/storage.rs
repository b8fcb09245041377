//! JSON-file-backed settings store.
//!
//! Persists the lock flag and the snapshot blob in a single file,
//! rewritten atomically (write to a sibling temp file, then rename).

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::SettingsStore;
use async_trait::async_trait;
use marklock_engine::Snapshot;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Persisted {
    locked: Option<bool>,
    snapshot: Option<Snapshot>,
}

/// Settings store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage_path.clone())
    }

    /// A missing file reads as empty settings; any other read or decode
    /// failure propagates.
    async fn read(&self) -> Result<Persisted> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Persisted::default()),
            Err(err) => return Err(Error::storage(format!("read {}: {err}", self.path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| Error::storage(format!("decode {}: {err}", self.path.display())))
    }

    async fn write(&self, data: &Persisted) -> Result<()> {
        let json = serde_json::to_vec(data)
            .map_err(|err| Error::storage(format!("encode settings: {err}")))?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .map_err(|err| Error::storage(format!("create {}: {err}", dir.display())))?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)
            .await
            .map_err(|err| Error::storage(format!("write {}: {err}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| Error::storage(format!("rename {}: {err}", self.path.display())))?;

        tracing::debug!(target: "marklock::storage", path = %self.path.display(), "settings persisted");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn locked(&self) -> Result<Option<bool>> {
        Ok(self.read().await?.locked)
    }

    async fn set_locked(&self, locked: bool) -> Result<()> {
        let mut data = self.read().await?;
        data.locked = Some(locked);
        self.write(&data).await
    }

    async fn snapshot(&self) -> Result<Option<Snapshot>> {
        Ok(self.read().await?.snapshot)
    }

    async fn set_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let mut data = self.read().await?;
        data.snapshot = Some(snapshot.clone());
        self.write(&data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marklock_engine::CanonicalNode;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("marklock.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.locked().await.unwrap(), None);
        assert!(store.snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lock_and_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut snapshot = Snapshot::new();
        snapshot.insert("toolbar", vec![CanonicalNode::link("Docs", "https://docs.rs")]);

        store.set_locked(true).await.unwrap();
        store.set_snapshot(&snapshot).await.unwrap();

        // Re-open from disk.
        let reopened = store_in(&dir);
        assert_eq!(reopened.locked().await.unwrap(), Some(true));
        assert_eq!(reopened.snapshot().await.unwrap().unwrap(), snapshot);
    }

    #[tokio::test]
    async fn setting_one_key_keeps_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut snapshot = Snapshot::new();
        snapshot.insert("menu", vec![]);
        store.set_snapshot(&snapshot).await.unwrap();
        store.set_locked(false).await.unwrap();

        assert_eq!(store.snapshot().await.unwrap().unwrap(), snapshot);
        assert_eq!(store.locked().await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marklock.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileStore::new(path);
        let result = store.locked().await;

        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/state/marklock.json"));

        store.set_locked(true).await.unwrap();
        assert_eq!(store.locked().await.unwrap(), Some(true));
    }
}
