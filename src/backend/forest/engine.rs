/**
 * Tree Engine
 *
 * In-memory algorithms over nodes fetched from a `NodeStore`:
 *
 * - full-tree materialization (children expanded into nested nodes)
 * - cascading deletion (parent unlink first, then post-order delete)
 * - parent lookup by child reference
 * - random leaf-to-root path sampling
 *
 * Every walk is iterative with an explicit stack, so tree depth is bounded
 * by `max_depth` rather than by the call stack. Strict walks fail with
 * `CorruptTree` when a node is reached twice; the deletion walk tolerates
 * revisits so it can still clear a damaged subtree.
 *
 * # Consistency
 *
 * Nothing here is transactional. Deletion removes the edge from the live
 * parent before touching the subtree, so an interrupted delete leaves
 * unreachable nodes behind rather than a parent pointing into a
 * half-deleted subtree. Deletes that already happened are not rolled back.
 */

use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{NodeFilter, NodeSort, NodeStore};
use crate::shared::{NodeId, PoetryNode, TreeNode};

/// Default bound on root-to-leaf depth before a walk gives up
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Tree operations over a shared node store
#[derive(Clone)]
pub struct TreeEngine {
    store: Arc<dyn NodeStore>,
    max_depth: usize,
}

/// Outcome of a cascading delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionReport {
    /// Nodes actually removed from the store; zero if the node was already gone
    pub removed: usize,
    /// Parent the node was detached from, if it had one
    pub detached_from: Option<NodeId>,
}

impl DeletionReport {
    pub fn is_noop(&self) -> bool {
        self.removed == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkMode {
    /// Revisits and depth overflow are `CorruptTree`
    Strict,
    /// Revisits are skipped, depth is unbounded
    Tolerant,
}

/// Everything reachable from one node, in pre-order
#[derive(Debug, Default)]
struct SubtreeWalk {
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, PoetryNode>,
    parents: HashMap<NodeId, NodeId>,
    /// Nodes none of whose children resolved
    leaves: Vec<NodeId>,
}

impl SubtreeWalk {
    /// Pick a leaf uniformly and return the path from the walk's root to it
    fn sample_path<R: Rng + ?Sized>(mut self, rng: &mut R) -> Vec<PoetryNode> {
        if self.leaves.is_empty() {
            return Vec::new();
        }
        let leaf = self.leaves[rng.gen_range(0..self.leaves.len())];

        let mut path = Vec::new();
        let mut current = Some(leaf);
        while let Some(id) = current {
            if let Some(node) = self.nodes.remove(&id) {
                path.push(node);
            }
            current = self.parents.get(&id).copied();
        }
        path.reverse();
        path
    }

    /// Assemble nested `TreeNode`s bottom-up without recursion
    fn into_tree(mut self, root_id: NodeId) -> Option<TreeNode> {
        let mut built: HashMap<NodeId, TreeNode> = HashMap::with_capacity(self.order.len());
        for id in self.order.iter().rev() {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(*id, TreeNode::from_node(node, children));
        }
        built.remove(&root_id)
    }
}

impl TreeEngine {
    pub fn new(store: Arc<dyn NodeStore>, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// All tree entry points, most recently created first
    pub async fn list_roots(&self) -> BackendResult<Vec<PoetryNode>> {
        Ok(self
            .store
            .find_where(NodeFilter::roots(), Some(NodeSort::CreatedAtDesc))
            .await?)
    }

    /// The node whose child list references `id`
    pub async fn find_parent(&self, id: NodeId) -> BackendResult<Option<PoetryNode>> {
        Ok(self.store.find_parent(id).await?)
    }

    /// Walk the subtree under `root_id`. `None` if the root itself is absent.
    async fn walk(&self, root_id: NodeId, mode: WalkMode) -> BackendResult<Option<SubtreeWalk>> {
        let mut walk = SubtreeWalk::default();
        let mut stack: Vec<(NodeId, usize)> = vec![(root_id, 1)];

        while let Some((id, depth)) = stack.pop() {
            if walk.nodes.contains_key(&id) {
                match mode {
                    WalkMode::Strict => {
                        return Err(BackendError::corrupt_tree(id, "node reached twice"));
                    }
                    WalkMode::Tolerant => continue,
                }
            }
            if mode == WalkMode::Strict && depth > self.max_depth {
                return Err(BackendError::corrupt_tree(
                    id,
                    format!("depth exceeds {}", self.max_depth),
                ));
            }

            let Some(node) = self.store.get(id).await? else {
                if id == root_id {
                    return Ok(None);
                }
                tracing::warn!("[Forest] Dangling child reference {} under root {}", id, root_id);
                walk.parents.remove(&id);
                continue;
            };

            walk.order.push(id);
            for child in node.children.iter().rev() {
                if mode == WalkMode::Strict || !walk.nodes.contains_key(child) {
                    walk.parents.entry(*child).or_insert(id);
                    stack.push((*child, depth + 1));
                }
            }
            walk.nodes.insert(id, node);
        }

        // Leaves are decided after the walk so dangling children do not count
        walk.leaves = walk
            .order
            .iter()
            .filter(|id| {
                walk.nodes[*id]
                    .children
                    .iter()
                    .all(|child| !walk.nodes.contains_key(child))
            })
            .copied()
            .collect();

        Ok(Some(walk))
    }

    /// Return the root with every descendant expanded.
    ///
    /// A child id that no longer resolves is dropped from the expansion.
    pub async fn materialize(&self, root_id: NodeId) -> BackendResult<TreeNode> {
        let walk = self
            .walk(root_id, WalkMode::Strict)
            .await?
            .ok_or_else(|| BackendError::not_found("Tree"))?;
        walk.into_tree(root_id)
            .ok_or_else(|| BackendError::corrupt_tree(root_id, "root missing from its own walk"))
    }

    /// Every tree in the forest, most recently planted first
    pub async fn materialize_forest(&self) -> BackendResult<Vec<TreeNode>> {
        let roots = self.list_roots().await?;
        let mut trees = Vec::with_capacity(roots.len());
        for root in roots {
            match self.materialize(root.id).await {
                Ok(tree) => trees.push(tree),
                // Deleted between the listing and the walk
                Err(BackendError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(trees)
    }

    /// Delete a node together with its whole subtree.
    ///
    /// An absent node is not an error; the report then says nothing was
    /// removed. The edge from the parent is removed and persisted before any
    /// node is deleted, then the subtree goes children-first.
    pub async fn delete_subtree(&self, id: NodeId) -> BackendResult<DeletionReport> {
        if self.store.get(id).await?.is_none() {
            return Ok(DeletionReport {
                removed: 0,
                detached_from: None,
            });
        }

        let parent = self.store.find_parent(id).await?;
        if let Some(parent) = &parent {
            self.store.pull_child(parent.id, id).await?;
            tracing::debug!("[Forest] Detached {} from parent {}", id, parent.id);
        }

        let Some(walk) = self.walk(id, WalkMode::Tolerant).await? else {
            // Deleted concurrently after the unlink
            return Ok(DeletionReport {
                removed: 0,
                detached_from: parent.map(|p| p.id),
            });
        };

        let mut removed = 0;
        for node_id in walk.order.iter().rev() {
            if self.store.delete(*node_id).await? {
                removed += 1;
            }
        }

        tracing::info!("[Forest] Deleted {} node(s) under {}", removed, id);
        Ok(DeletionReport {
            removed,
            detached_from: parent.map(|p| p.id),
        })
    }

    /// A uniformly chosen leaf and its ancestors, root first.
    ///
    /// A childless root yields `[root]`; an absent root yields an empty path.
    pub async fn random_path(&self, root_id: NodeId) -> BackendResult<Vec<PoetryNode>> {
        let Some(walk) = self.walk(root_id, WalkMode::Strict).await? else {
            return Ok(Vec::new());
        };
        Ok(walk.sample_path(&mut rand::thread_rng()))
    }

    /// `random_path` with a caller-supplied random source
    pub async fn random_path_with<R: Rng + Send + ?Sized>(
        &self,
        root_id: NodeId,
        rng: &mut R,
    ) -> BackendResult<Vec<PoetryNode>> {
        let Some(walk) = self.walk(root_id, WalkMode::Strict).await? else {
            return Ok(Vec::new());
        };
        Ok(walk.sample_path(rng))
    }
}

/// Render a path as verse, one line per node.
///
/// Named authors follow their line after a tilde; anonymous lines stand
/// alone.
pub fn render_path(path: &[PoetryNode]) -> String {
    let mut out = String::new();
    for node in path {
        out.push_str(&node.text);
        if let Some(author) = node.display_author() {
            out.push_str("  ~ ");
            out.push_str(author);
        }
        out.push('\n');
    }
    out
}
