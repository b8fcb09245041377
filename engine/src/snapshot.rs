//! The authoritative layout snapshot.
//!
//! A snapshot maps every top-level root of the hierarchy to the ordered
//! canonical children captured under it. It is created wholesale by the
//! canonicalizer, persisted as a single JSON blob, treated as read-only
//! during reconciliation, and replaced wholesale on the next capture -
//! never patched incrementally.

use crate::{error::Result, CanonicalNode, Error, RootId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point-in-time capture of the desired layout, one entry per root.
///
/// Uses BTreeMap instead of HashMap for deterministic serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    roots: BTreeMap<RootId, Vec<CanonicalNode>>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the desired children for one root.
    pub fn insert(&mut self, root_id: impl Into<RootId>, children: Vec<CanonicalNode>) {
        self.roots.insert(root_id.into(), children);
    }

    /// Desired children of a root, if the root was captured.
    ///
    /// An absent root reads as "nothing captured"; callers treat it as an
    /// empty desired sequence rather than an error.
    pub fn root(&self, root_id: &str) -> Option<&[CanonicalNode]> {
        self.roots.get(root_id).map(Vec::as_slice)
    }

    /// Iterate captured roots in deterministic order.
    pub fn roots(&self) -> impl Iterator<Item = (&RootId, &[CanonicalNode])> {
        self.roots.iter().map(|(id, children)| (id, children.as_slice()))
    }

    /// Number of captured roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Check if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }
}
