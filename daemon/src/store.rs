//! Persistent settings: the lock flag and the layout snapshot.

use crate::error::Result;
use async_trait::async_trait;
use marklock_engine::Snapshot;
use std::sync::Mutex;

/// Persistence for the two values the daemon keeps: whether the layout is
/// locked, and the snapshot it is locked to.
///
/// Absent keys read as `None`; interpreting absence (first run, nothing
/// captured yet) is the orchestrator's job, not the store's.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn locked(&self) -> Result<Option<bool>>;
    async fn set_locked(&self, locked: bool) -> Result<()>;
    async fn snapshot(&self) -> Result<Option<Snapshot>>;
    async fn set_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    locked: Option<bool>,
    snapshot: Option<Snapshot>,
}

/// In-memory store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn locked(&self) -> Result<Option<bool>> {
        Ok(self.with_state(|s| s.locked))
    }

    async fn set_locked(&self, locked: bool) -> Result<()> {
        self.with_state(|s| s.locked = Some(locked));
        Ok(())
    }

    async fn snapshot(&self) -> Result<Option<Snapshot>> {
        Ok(self.with_state(|s| s.snapshot.clone()))
    }

    async fn set_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.with_state(|s| s.snapshot = Some(snapshot.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marklock_engine::CanonicalNode;

    #[tokio::test]
    async fn absent_keys_read_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.locked().await.unwrap(), None);
        assert!(store.snapshot().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lock_flag_roundtrip() {
        let store = MemoryStore::new();
        store.set_locked(true).await.unwrap();
        assert_eq!(store.locked().await.unwrap(), Some(true));

        store.set_locked(false).await.unwrap();
        assert_eq!(store.locked().await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn snapshot_replaced_wholesale() {
        let store = MemoryStore::new();

        let mut first = Snapshot::new();
        first.insert("toolbar", vec![CanonicalNode::separator()]);
        store.set_snapshot(&first).await.unwrap();

        let mut second = Snapshot::new();
        second.insert("menu", vec![]);
        store.set_snapshot(&second).await.unwrap();

        let stored = store.snapshot().await.unwrap().unwrap();
        assert_eq!(stored, second);
        assert!(stored.root("toolbar").is_none());
    }
}
