//! # Marklock Engine
//!
//! Snapshot and reconciliation engine for protecting a bookmark layout.
//!
//! This crate provides the core logic for keeping a hierarchical tree of
//! folders, links and separators converged onto a previously captured
//! authoritative snapshot. It decides what to change; it never touches
//! the live tree itself.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of browsers, storage, or platform
//! - **Deterministic**: the same inputs always produce the same plan
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Canonical form
//!
//! [`canonicalize`] reduces a provider-reported tree to [`CanonicalNode`]s:
//! kind, title, url and ordered children. Provider identifiers are dropped
//! because they do not survive a delete and recreate, so reconciliation
//! compares structurally instead.
//!
//! ### Snapshot
//!
//! A [`Snapshot`] maps each top-level root to its desired canonical
//! children. It is captured wholesale, persisted as one JSON blob, and
//! replaced wholesale - never patched.
//!
//! ### Plans
//!
//! [`plan`] compares the live children of one parent against the desired
//! children and emits ordered corrective steps: creates, moves, removals,
//! and descents into matched folders. Applying plans level by level
//! converges the whole tree in a single pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use marklock_engine::{canonicalize, plan, NodeKind, Step, TreeNode};
//!
//! // The live hierarchy, as a provider would report it.
//! let tree = TreeNode {
//!     id: "root".into(),
//!     kind: NodeKind::Folder,
//!     title: String::new(),
//!     url: String::new(),
//!     children: vec![TreeNode {
//!         id: "toolbar".into(),
//!         kind: NodeKind::Folder,
//!         title: "Toolbar".into(),
//!         url: String::new(),
//!         children: vec![TreeNode {
//!             id: "b1".into(),
//!             kind: NodeKind::Link,
//!             title: "Docs".into(),
//!             url: "https://docs.rs".into(),
//!             children: vec![],
//!         }],
//!     }],
//! };
//!
//! // Capture the layout to protect.
//! let snapshot = canonicalize(&tree);
//! let desired = snapshot.root("toolbar").unwrap();
//!
//! // Against an emptied toolbar, the plan recreates the link at index 0.
//! let level_plan = plan(&[], desired);
//! assert!(matches!(level_plan.steps[0], Step::Create { index: 0, .. }));
//! assert!(level_plan.removals.is_empty());
//! ```

pub mod canonical;
pub mod error;
pub mod node;
pub mod reconcile;
pub mod snapshot;

// Re-export main types at crate root
pub use canonical::canonicalize;
pub use error::Error;
pub use node::{CanonicalNode, LiveChild, NodeKind, TreeNode};
pub use reconcile::{plan, Descent, Plan, Step};
pub use snapshot::Snapshot;

/// Type aliases for clarity
pub type NodeId = String;
pub type RootId = String;
