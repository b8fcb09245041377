//! The live tree provider contract.
//!
//! The host environment owns the real hierarchy; the daemon only ever
//! touches it through this trait. Mutations performed here fire the host's
//! own change events, which is why the orchestrator guards against
//! re-entry (see [`crate::orchestrator`]).

use crate::error::Result;
use async_trait::async_trait;
use marklock_engine::{CanonicalNode, LiveChild, NodeId, NodeKind, TreeNode};

/// Request to create a node under a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub parent_id: NodeId,
    /// Position among siblings; append when `None`.
    pub index: Option<usize>,
    pub kind: NodeKind,
    pub title: String,
    pub url: String,
}

impl CreateRequest {
    /// Build a request from a canonical node. The node's children are not
    /// part of the request; callers create them in follow-up requests.
    pub fn from_node(parent_id: impl Into<NodeId>, index: Option<usize>, node: &CanonicalNode) -> Self {
        Self {
            parent_id: parent_id.into(),
            index,
            kind: node.kind,
            title: node.title.clone(),
            url: node.url.clone(),
        }
    }
}

/// Read and write access to the live hierarchical item store.
///
/// Implementations map provider-specific node kinds onto [`NodeKind`]
/// best-effort (anything unrecognized reads as a link) so capture never
/// fails on an externally controlled hierarchy.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    /// The full live hierarchy. The top-level children of the returned
    /// node are the roots.
    async fn tree(&self) -> Result<TreeNode>;

    /// Ordered children of one parent. Non-folders report no children.
    async fn children(&self, id: &str) -> Result<Vec<LiveChild>>;

    /// Create a node, returning it with its provider-assigned id.
    async fn create(&self, request: CreateRequest) -> Result<LiveChild>;

    /// Reposition a node among its siblings, as a remove followed by an
    /// insert at `index`; sibling indices shift implicitly.
    async fn move_node(&self, id: &str, index: usize) -> Result<()>;

    /// Remove a node and its entire subtree.
    async fn remove_tree(&self, id: &str) -> Result<()>;
}
