//! The reconciliation orchestrator: lock state machine and pass driver.
//!
//! Every tree mutation event funnels into [`Orchestrator::restore_snapshot`].
//! The corrective operations a pass issues fire the host's own mutation
//! events, so a pass guards against re-entry: at most one pass is active
//! at a time, and events arriving while one runs are dropped outright,
//! not queued. The in-progress pass converges the tree regardless of what
//! additional event fired, and queuing could cascade without bound when
//! the live tree is far from desired.

use crate::error::Result;
use crate::events::{LockState, TreeEvent};
use crate::indicator::LockIndicator;
use crate::provider::{CreateRequest, TreeProvider};
use crate::store::SettingsStore;
use marklock_engine::{canonicalize, reconcile, CanonicalNode, Step};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Whether a reconciliation pass is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassState {
    Idle,
    Reconciling,
}

/// Token for an active pass; returns the orchestrator to idle on drop,
/// error paths included.
struct PassToken<'a> {
    state: &'a Mutex<PassState>,
}

impl Drop for PassToken<'_> {
    fn drop(&mut self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = PassState::Idle;
    }
}

/// Owns the lock state machine and drives reconciliation passes.
pub struct Orchestrator<P, S, I> {
    provider: P,
    store: S,
    indicator: I,
    state: Mutex<PassState>,
}

impl<P, S, I> Orchestrator<P, S, I>
where
    P: TreeProvider,
    S: SettingsStore,
    I: LockIndicator,
{
    pub fn new(provider: P, store: S, indicator: I) -> Self {
        Self {
            provider,
            store,
            indicator,
            state: Mutex::new(PassState::Idle),
        }
    }

    /// The live tree provider this orchestrator drives.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The settings store this orchestrator persists to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session startup: default the lock flag on first run and sync the
    /// indicator to the persisted state.
    pub async fn init(&self) -> Result<()> {
        let locked = match self.store.locked().await? {
            Some(locked) => locked,
            None => {
                tracing::info!(target: "marklock::init", "first run detected, initializing to unlocked");
                self.store.set_locked(false).await?;
                false
            }
        };
        self.indicator.set_locked(locked);
        tracing::info!(
            target: "marklock::init",
            mode = if locked { "locked" } else { "unlocked" },
            "session started"
        );
        Ok(())
    }

    /// Entry point for all four tree mutation events.
    pub async fn handle_event(&self, event: TreeEvent) -> Result<()> {
        tracing::debug!(target: "marklock::event", ?event, "tree mutation reported");
        self.restore_snapshot().await
    }

    /// Run one reconciliation pass, unless unlocked or one is already
    /// active. Lock flag and snapshot are read once at pass start and
    /// treated as stable for the whole pass.
    pub async fn restore_snapshot(&self) -> Result<()> {
        let Some(_token) = self.try_begin_pass() else {
            tracing::debug!(target: "marklock::guard", "pass already active, event dropped");
            return Ok(());
        };

        if !self.store.locked().await?.unwrap_or(false) {
            return Ok(());
        }
        let snapshot = self.store.snapshot().await?.unwrap_or_default();

        tracing::info!(target: "marklock::guard", "unauthorized change detected, reverting");

        let tree = self.provider.tree().await?;
        for root in &tree.children {
            // A root the snapshot never captured reads as "desired =
            // nothing": everything under it goes.
            let desired = snapshot.root(&root.id).unwrap_or(&[]);
            if let Err(err) = self.restore_root(&root.id, desired).await {
                tracing::error!(
                    target: "marklock::error",
                    root = %root.id,
                    %err,
                    "failed to restore root"
                );
            }
        }

        tracing::info!(target: "marklock::guard", "layout verified and restored");
        Ok(())
    }

    /// Persist the lock flag; enabling also re-captures the snapshot, so
    /// protection re-arms against the current layout, not a historical
    /// one. Disabling leaves the stored snapshot untouched.
    pub async fn update_lock(&self, value: bool) -> Result<()> {
        self.store.set_locked(value).await?;
        if value {
            self.capture_snapshot().await?;
        }
        self.indicator.set_locked(value);
        tracing::info!(
            target: "marklock::event",
            "protection {}",
            if value { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Capture the current live hierarchy as the new authoritative
    /// snapshot and persist it wholesale.
    pub async fn capture_snapshot(&self) -> Result<()> {
        tracing::info!(target: "marklock::storage", "capturing layout snapshot");
        let tree = self.provider.tree().await?;
        let snapshot = canonicalize(&tree);
        self.store.set_snapshot(&snapshot).await?;
        tracing::info!(target: "marklock::storage", roots = snapshot.len(), "snapshot synchronized");
        Ok(())
    }

    /// Current lock state, for the UI surface.
    pub async fn state(&self) -> Result<LockState> {
        Ok(LockState {
            locked: self.store.locked().await?.unwrap_or(false),
        })
    }

    fn try_begin_pass(&self) -> Option<PassToken<'_>> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match *state {
            PassState::Reconciling => None,
            PassState::Idle => {
                *state = PassState::Reconciling;
                Some(PassToken { state: &self.state })
            }
        }
    }

    /// Converge one root onto its desired children, walking matched
    /// folders with an explicit worklist. Depth bound equals hierarchy
    /// depth; providers are acyclic by construction.
    async fn restore_root(&self, root_id: &str, desired: &[CanonicalNode]) -> Result<()> {
        let mut work = VecDeque::new();
        work.push_back((root_id.to_string(), desired.to_vec()));

        while let Some((parent_id, desired)) = work.pop_front() {
            let current = self.provider.children(&parent_id).await?;
            let plan = reconcile::plan(&current, &desired);

            // Steps settle positions left to right; each one assumes all
            // lower indices are already in place.
            for step in &plan.steps {
                match step {
                    Step::Create { index, node } => {
                        self.create_subtree(&parent_id, Some(*index), node).await?;
                    }
                    Step::Move { id, to } => {
                        self.provider.move_node(id, *to).await?;
                    }
                }
            }
            for id in &plan.removals {
                self.provider.remove_tree(id).await?;
            }
            for descent in plan.descents {
                work.push_back((descent.id, descent.desired));
            }
        }
        Ok(())
    }

    /// Create a node and, for folders, its entire subtree. Descendants
    /// are appended in order without explicit indices; only the top node
    /// takes a position among existing siblings.
    async fn create_subtree(
        &self,
        parent_id: &str,
        index: Option<usize>,
        node: &CanonicalNode,
    ) -> Result<()> {
        let mut work = VecDeque::new();
        work.push_back((parent_id.to_string(), index, node.clone()));

        while let Some((parent_id, index, node)) = work.pop_front() {
            let created = self
                .provider
                .create(CreateRequest::from_node(parent_id, index, &node))
                .await?;
            for child in node.children {
                work.push_back((created.id.clone(), None, child));
            }
        }
        Ok(())
    }
}
