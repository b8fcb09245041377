//! # Marklock Daemon
//!
//! Async orchestration for protecting a bookmark layout with the
//! [`marklock_engine`] reconciliation logic.
//!
//! The daemon owns the lock state machine and the reconciliation passes;
//! the host environment supplies the live hierarchy, persistence, and the
//! UI surface through three traits:
//!
//! - [`TreeProvider`] - read, create, move and remove nodes in the live
//!   tree (and fire change events back at the daemon)
//! - [`SettingsStore`] - persist the lock flag and the snapshot blob
//! - [`LockIndicator`] - the visible locked/unlocked glyph
//!
//! Wire an [`Orchestrator`] over those three, call
//! [`Orchestrator::init`] once at startup, and feed it [`TreeEvent`]s and
//! [`Command`]s - directly, or through the [`run`] channel loop. While
//! locked, any mutation event triggers a reconciliation pass that
//! converges the live tree back onto the captured snapshot; while
//! unlocked, events are no-ops.
//!
//! [`MemoryTree`] and [`MemoryStore`] provide in-memory collaborators for
//! tests and dry runs; [`FileStore`] persists settings to a JSON file.

pub mod config;
pub mod error;
pub mod events;
pub mod indicator;
pub mod memory;
pub mod orchestrator;
pub mod provider;
pub mod storage;
pub mod store;

// Re-export main types at crate root
pub use config::Config;
pub use error::{Error, Result};
pub use events::{run, Command, LockState, TreeEvent};
pub use indicator::{LockIndicator, NoopIndicator};
pub use memory::{MemoryTree, Mutation, ROOT_ID};
pub use orchestrator::Orchestrator;
pub use provider::{CreateRequest, TreeProvider};
pub use storage::FileStore;
pub use store::{MemoryStore, SettingsStore};
