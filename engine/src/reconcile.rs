//! Reconciliation planning: converging one live level onto its snapshot.
//!
//! This is the core of the engine. Given the live children of a parent and
//! the canonical children the snapshot wants there, [`plan`] produces the
//! ordered corrective steps that make the level match.
//!
//! # Algorithm
//!
//! For every desired position `i` in ascending order:
//!
//! 1. Search the unconsumed live children for the first whose
//!    `(title, url)` pair equals the desired item's pair.
//! 2. No match: emit a create at position `i` (folders bring their whole
//!    subtree with them). A created item counts as settled at `i`.
//! 3. Match: consume it, emit a move to `i` if it is not already there,
//!    and schedule a descent into its live children when the desired item
//!    is a folder.
//!
//! Every live child left unconsumed afterwards is removed, subtree and
//! all. Matching is greedy and stable: desired order, leftmost unconsumed
//! candidate. Two desired items with identical title and url may claim
//! either live instance; they are content-equivalent, so the choice does
//! not matter.
//!
//! The planner tracks how each step shifts sibling positions, so a move
//! is emitted from an item's position at that point in the plan, not from
//! its possibly stale fetch-time index. Applying the steps strictly in
//! order therefore settles positions `0..i` before step `i` targets `i`,
//! which is what makes a pass converge in one sweep.

use crate::{CanonicalNode, LiveChild, NodeId};

/// A single corrective step at one parent, applied strictly in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create `node` at `index`; folders are created with their entire
    /// subtree before the next step runs.
    Create { index: usize, node: CanonicalNode },
    /// Reposition an existing child among its siblings.
    Move { id: NodeId, to: usize },
}

/// Recursion into a matched live folder: its children are reconciled
/// against `desired` as the next level of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub id: NodeId,
    pub desired: Vec<CanonicalNode>,
}

/// The corrective plan for one parent level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Creates and moves, in the order they must be applied
    pub steps: Vec<Step>,
    /// Matched folders to recurse into after this level settles
    pub descents: Vec<Descent>,
    /// Unconsumed live children to remove, subtree and all
    pub removals: Vec<NodeId>,
}

impl Plan {
    /// Check if the level already matches (descents aside).
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty() && self.removals.is_empty()
    }

    /// Number of mutations this plan will issue at this level.
    pub fn op_count(&self) -> usize {
        self.steps.len() + self.removals.len()
    }
}

/// The match predicate compares title and url only. Kind is deliberately
/// not compared: a separator and an empty-title, empty-url folder satisfy
/// the same predicate. Longstanding behavior, kept as-is.
fn matches(live: &LiveChild, want: &CanonicalNode) -> bool {
    live.title == want.title && live.url == want.url
}

/// Slot in the working order of the level while planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Live child, by position in the fetched `current` slice
    Live(usize),
    /// Item created by an earlier step of this plan
    Created,
}

/// Compute the corrective plan for one parent level.
///
/// `current` must be in provider order. The returned steps assume they are
/// applied in sequence against that same level, with moves performed as
/// remove-then-insert and creates inserting at their index.
pub fn plan(current: &[LiveChild], desired: &[CanonicalNode]) -> Plan {
    let mut plan = Plan::default();
    let mut consumed = vec![false; current.len()];
    // Working order of the level, updated as steps are planned.
    let mut order: Vec<Slot> = (0..current.len()).map(Slot::Live).collect();

    for (i, want) in desired.iter().enumerate() {
        let found = current
            .iter()
            .enumerate()
            .find(|(j, cur)| !consumed[*j] && matches(cur, want));

        let Some((j, cur)) = found else {
            plan.steps.push(Step::Create {
                index: i,
                node: want.clone(),
            });
            order.insert(i, Slot::Created);
            continue;
        };

        consumed[j] = true;
        let pos = order
            .iter()
            .position(|slot| *slot == Slot::Live(j))
            .expect("unconsumed child still in working order");
        if pos != i {
            plan.steps.push(Step::Move {
                id: cur.id.clone(),
                to: i,
            });
            let slot = order.remove(pos);
            order.insert(i, slot);
        }
        if want.kind.is_folder() {
            plan.descents.push(Descent {
                id: cur.id.clone(),
                desired: want.children.clone(),
            });
        }
    }

    for (j, cur) in current.iter().enumerate() {
        if !consumed[j] {
            plan.removals.push(cur.id.clone());
        }
    }

    plan
}
