//! Node types for the bookmark hierarchy.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Kind of an item in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A container with ordered children
    Folder,
    /// A titled URL
    Link,
    /// A visual divider, no title or url
    Separator,
}

impl NodeKind {
    /// Check if this kind can carry children.
    pub fn is_folder(self) -> bool {
        matches!(self, NodeKind::Folder)
    }
}

/// One item of a captured layout.
///
/// Canonical nodes are metadata-reduced: only kind, title, url and child
/// order survive capture. Provider identifiers are deliberately dropped
/// because they are not stable across a delete and recreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNode {
    /// Kind of the item
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display title, empty allowed
    #[serde(default)]
    pub title: String,
    /// Target URL, empty unless the item is a link
    #[serde(default)]
    pub url: String,
    /// Ordered children, non-empty only for folders
    #[serde(default)]
    pub children: Vec<CanonicalNode>,
}

impl CanonicalNode {
    /// Create a canonical folder with ordered children.
    pub fn folder(title: impl Into<String>, children: Vec<CanonicalNode>) -> Self {
        Self {
            kind: NodeKind::Folder,
            title: title.into(),
            url: String::new(),
            children,
        }
    }

    /// Create a canonical link.
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Link,
            title: title.into(),
            url: url.into(),
            children: Vec::new(),
        }
    }

    /// Create a canonical separator.
    pub fn separator() -> Self {
        Self {
            kind: NodeKind::Separator,
            title: String::new(),
            url: String::new(),
            children: Vec::new(),
        }
    }
}

/// One child of a live parent, as reported by the tree provider.
///
/// The identifier is opaque and provider-assigned: stable across moves,
/// not across delete and recreate. Reconciliation therefore matches live
/// children against canonical nodes structurally, never by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveChild {
    /// Provider-assigned identifier
    pub id: NodeId,
    /// Kind of the item
    pub kind: NodeKind,
    /// Display title, empty allowed
    pub title: String,
    /// Target URL, empty unless the item is a link
    pub url: String,
    /// Position among siblings at fetch time
    pub index: usize,
}

/// A fully materialized live subtree, as returned by the provider's
/// whole-tree read. The top-level children of the outermost node are the
/// roots of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Provider-assigned identifier
    pub id: NodeId,
    /// Kind of the item
    pub kind: NodeKind,
    /// Display title, empty allowed
    #[serde(default)]
    pub title: String,
    /// Target URL, empty unless the item is a link
    #[serde(default)]
    pub url: String,
    /// Ordered children
    #[serde(default)]
    pub children: Vec<TreeNode>,
}
