//! In-memory tree provider.
//!
//! Backs the integration tests, and doubles as a dry-run target for
//! embedding hosts. Every mutation is recorded in a log so tests can
//! assert not just the final layout but which operations produced it.

use crate::error::{Error, Result};
use crate::provider::{CreateRequest, TreeProvider};
use async_trait::async_trait;
use marklock_engine::{LiveChild, NodeId, NodeKind, TreeNode};
use std::collections::HashMap;
use std::sync::Mutex;

/// Identifier of the virtual root whose children are the top-level roots.
pub const ROOT_ID: &str = "root";

/// One recorded mutation of the live tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { parent_id: NodeId, id: NodeId },
    Move { id: NodeId, index: usize },
    Remove { id: NodeId },
}

#[derive(Debug, Clone)]
struct MemNode {
    kind: NodeKind,
    title: String,
    url: String,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Inner {
    nodes: HashMap<NodeId, MemNode>,
    parents: HashMap<NodeId, NodeId>,
    next_id: u64,
    log: Vec<Mutation>,
}

/// An in-memory hierarchy implementing [`TreeProvider`].
#[derive(Debug)]
pub struct MemoryTree {
    inner: Mutex<Inner>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            MemNode {
                kind: NodeKind::Folder,
                title: String::new(),
                url: String::new(),
                children: Vec::new(),
            },
        );
        Self {
            inner: Mutex::new(Inner {
                nodes,
                parents: HashMap::new(),
                next_id: 0,
                log: Vec::new(),
            }),
        }
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut inner)
    }

    /// Register a provider-owned top-level root.
    pub fn add_root(&self, id: impl Into<NodeId>) {
        let id = id.into();
        self.with_inner(|inner| {
            insert_node(
                inner,
                ROOT_ID,
                None,
                id.clone(),
                NodeKind::Folder,
                String::new(),
                String::new(),
            );
        });
    }

    /// Place a node directly, without logging. Test and seeding path; the
    /// guarded path is [`TreeProvider::create`].
    pub fn seed(
        &self,
        parent_id: &str,
        kind: NodeKind,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> NodeId {
        let (title, url) = (title.into(), url.into());
        self.with_inner(|inner| {
            let id = format!("node-{}", inner.next_id);
            inner.next_id += 1;
            insert_node(inner, parent_id, None, id.clone(), kind, title, url);
            id
        })
    }

    pub fn seed_link(&self, parent_id: &str, title: &str, url: &str) -> NodeId {
        self.seed(parent_id, NodeKind::Link, title, url)
    }

    pub fn seed_folder(&self, parent_id: &str, title: &str) -> NodeId {
        self.seed(parent_id, NodeKind::Folder, title, "")
    }

    pub fn seed_separator(&self, parent_id: &str) -> NodeId {
        self.seed(parent_id, NodeKind::Separator, "", "")
    }

    /// Check whether a node currently exists.
    pub fn exists(&self, id: &str) -> bool {
        self.with_inner(|inner| inner.nodes.contains_key(id))
    }

    /// All mutations recorded since the last [`Self::clear_log`].
    pub fn mutations(&self) -> Vec<Mutation> {
        self.with_inner(|inner| inner.log.clone())
    }

    pub fn mutation_count(&self) -> usize {
        self.with_inner(|inner| inner.log.len())
    }

    pub fn clear_log(&self) {
        self.with_inner(|inner| inner.log.clear());
    }
}

fn insert_node(
    inner: &mut Inner,
    parent_id: &str,
    index: Option<usize>,
    id: NodeId,
    kind: NodeKind,
    title: String,
    url: String,
) {
    inner.nodes.insert(
        id.clone(),
        MemNode {
            kind,
            title,
            url,
            children: Vec::new(),
        },
    );
    inner.parents.insert(id.clone(), parent_id.to_string());
    if let Some(parent) = inner.nodes.get_mut(parent_id) {
        let at = index.unwrap_or(parent.children.len()).min(parent.children.len());
        parent.children.insert(at, id);
    }
}

fn build_tree(inner: &Inner, id: &str) -> Option<TreeNode> {
    let node = inner.nodes.get(id)?;
    Some(TreeNode {
        id: id.to_string(),
        kind: node.kind,
        title: node.title.clone(),
        url: node.url.clone(),
        children: node
            .children
            .iter()
            .filter_map(|child| build_tree(inner, child))
            .collect(),
    })
}

#[async_trait]
impl TreeProvider for MemoryTree {
    async fn tree(&self) -> Result<TreeNode> {
        self.with_inner(|inner| {
            build_tree(inner, ROOT_ID).ok_or_else(|| Error::provider("virtual root missing"))
        })
    }

    async fn children(&self, id: &str) -> Result<Vec<LiveChild>> {
        self.with_inner(|inner| {
            let node = inner
                .nodes
                .get(id)
                .ok_or_else(|| Error::provider(format!("unknown node: {id}")))?;
            Ok(node
                .children
                .iter()
                .enumerate()
                .filter_map(|(index, child_id)| {
                    inner.nodes.get(child_id).map(|child| LiveChild {
                        id: child_id.clone(),
                        kind: child.kind,
                        title: child.title.clone(),
                        url: child.url.clone(),
                        index,
                    })
                })
                .collect())
        })
    }

    async fn create(&self, request: CreateRequest) -> Result<LiveChild> {
        self.with_inner(|inner| {
            if !inner.nodes.contains_key(&request.parent_id) {
                return Err(Error::provider(format!(
                    "unknown parent: {}",
                    request.parent_id
                )));
            }
            let id = format!("node-{}", inner.next_id);
            inner.next_id += 1;
            insert_node(
                inner,
                &request.parent_id,
                request.index,
                id.clone(),
                request.kind,
                request.title.clone(),
                request.url.clone(),
            );
            inner.log.push(Mutation::Create {
                parent_id: request.parent_id.clone(),
                id: id.clone(),
            });

            let index = inner
                .nodes
                .get(&request.parent_id)
                .and_then(|p| p.children.iter().position(|c| *c == id))
                .unwrap_or(0);
            Ok(LiveChild {
                id,
                kind: request.kind,
                title: request.title,
                url: request.url,
                index,
            })
        })
    }

    async fn move_node(&self, id: &str, index: usize) -> Result<()> {
        self.with_inner(|inner| {
            let parent_id = inner
                .parents
                .get(id)
                .cloned()
                .ok_or_else(|| Error::provider(format!("unknown node: {id}")))?;
            let parent = inner
                .nodes
                .get_mut(&parent_id)
                .ok_or_else(|| Error::provider(format!("unknown parent: {parent_id}")))?;
            let pos = parent
                .children
                .iter()
                .position(|c| c.as_str() == id)
                .ok_or_else(|| Error::provider(format!("detached node: {id}")))?;

            // Remove then insert; siblings shift implicitly.
            let child = parent.children.remove(pos);
            let at = index.min(parent.children.len());
            parent.children.insert(at, child);

            inner.log.push(Mutation::Move {
                id: id.to_string(),
                index,
            });
            Ok(())
        })
    }

    async fn remove_tree(&self, id: &str) -> Result<()> {
        self.with_inner(|inner| {
            if id == ROOT_ID {
                return Err(Error::provider("cannot remove the virtual root"));
            }
            if !inner.nodes.contains_key(id) {
                return Err(Error::provider(format!("unknown node: {id}")));
            }

            if let Some(parent_id) = inner.parents.get(id).cloned() {
                if let Some(parent) = inner.nodes.get_mut(&parent_id) {
                    parent.children.retain(|c| c.as_str() != id);
                }
            }

            let mut stack = vec![id.to_string()];
            while let Some(current) = stack.pop() {
                if let Some(node) = inner.nodes.remove(&current) {
                    stack.extend(node.children);
                }
                inner.parents.remove(&current);
            }

            inner.log.push(Mutation::Remove { id: id.to_string() });
            Ok(())
        })
    }
}
