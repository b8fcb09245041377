//! Canonicalization of a live tree into snapshot form.
//!
//! Capture is a pure function of the provider-reported tree: every node is
//! reduced to kind, title, url and ordered children, with absent fields
//! defaulting to empty strings. Sibling order in the output matches the
//! provider's reported order exactly, because that order is the layout
//! being protected.

use crate::{CanonicalNode, Snapshot, TreeNode};

/// Capture the full live hierarchy as a snapshot.
///
/// The top-level children of `root` are the roots of the hierarchy; each
/// becomes one snapshot entry keyed by its provider id. Total, never
/// fails: the hierarchy is externally controlled, so any node the
/// provider reports is captured as-is.
pub fn canonicalize(root: &TreeNode) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for top in &root.children {
        snapshot.insert(
            top.id.clone(),
            top.children.iter().map(canonical_node).collect(),
        );
    }
    snapshot
}

fn canonical_node(node: &TreeNode) -> CanonicalNode {
    CanonicalNode {
        kind: node.kind,
        title: node.title.clone(),
        url: node.url.clone(),
        children: node.children.iter().map(canonical_node).collect(),
    }
}
