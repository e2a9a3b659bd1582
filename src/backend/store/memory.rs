//! In-memory store
//!
//! All state lives behind one `tokio::sync::RwLock`, so every operation,
//! including `push_child`, is atomic with respect to the others. A
//! child → parent index is kept next to the forward child lists and is
//! updated under the same lock whenever an edge changes.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NodeFilter, NodeSort, NodeStore, PoemStore, StoreError};
use crate::shared::{NewNode, NewPoem, NodeId, NodeUpdate, PoemId, PoemUpdate, PoetryNode, PrivatePoem};

/// A record plus its insertion sequence, used to break timestamp ties
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: HashMap<NodeId, Stored<PoetryNode>>,
    parents: HashMap<NodeId, NodeId>,
    poems: HashMap<PoemId, Stored<PrivatePoem>>,
    next_seq: u64,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.parents.insert(child, parent);
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if self.parents.get(&child) == Some(&parent) {
            self.parents.remove(&child);
        }
    }

    fn replace_children(&mut self, parent: NodeId, old: &[NodeId], new: &[NodeId]) {
        for child in old {
            self.unlink(parent, *child);
        }
        for child in new {
            self.link(parent, *child);
        }
    }
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes
    pub async fn node_count(&self) -> usize {
        self.inner.read().await.nodes.len()
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, id: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        Ok(self.inner.read().await.nodes.get(&id).map(|s| s.value.clone()))
    }

    async fn create(&self, node: NewNode) -> Result<PoetryNode, StoreError> {
        let mut inner = self.inner.write().await;
        let node = node.into_node(Uuid::new_v4(), Utc::now());
        let seq = inner.next_seq();
        inner.nodes.insert(
            node.id,
            Stored {
                seq,
                value: node.clone(),
            },
        );
        Ok(node)
    }

    async fn update_fields(&self, id: NodeId, update: NodeUpdate) -> Result<Option<PoetryNode>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.nodes.get_mut(&id) else {
            return Ok(None);
        };
        let old_children = stored.value.children.clone();
        update.apply(&mut stored.value);
        let updated = stored.value.clone();
        if old_children != updated.children {
            inner.replace_children(id, &old_children, &updated.children);
        }
        Ok(Some(updated))
    }

    async fn delete(&self, id: NodeId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(removed) = inner.nodes.remove(&id) else {
            return Ok(false);
        };
        inner.parents.remove(&id);
        for child in &removed.value.children {
            inner.unlink(id, *child);
        }
        Ok(true)
    }

    async fn find_where(&self, filter: NodeFilter, sort: Option<NodeSort>) -> Result<Vec<PoetryNode>, StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&Stored<PoetryNode>> = inner
            .nodes
            .values()
            .filter(|stored| filter.matches(&stored.value))
            .collect();
        match sort {
            Some(NodeSort::CreatedAtDesc) => {
                matched.sort_by(|a, b| (b.value.created_at, b.seq).cmp(&(a.value.created_at, a.seq)))
            }
            None => matched.sort_by_key(|stored| stored.seq),
        }
        Ok(matched.into_iter().map(|s| s.value.clone()).collect())
    }

    async fn push_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.nodes.get_mut(&parent) else {
            return Ok(None);
        };
        if !stored.value.children.contains(&child) {
            stored.value.children.push(child);
        }
        let updated = stored.value.clone();
        inner.link(parent, child);
        Ok(Some(updated))
    }

    async fn pull_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.nodes.get_mut(&parent) else {
            return Ok(None);
        };
        stored.value.children.retain(|id| *id != child);
        let updated = stored.value.clone();
        inner.unlink(parent, child);
        Ok(Some(updated))
    }

    async fn find_parent(&self, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .parents
            .get(&child)
            .and_then(|parent| inner.nodes.get(parent))
            .map(|stored| stored.value.clone()))
    }
}

#[async_trait]
impl PoemStore for MemoryStore {
    async fn get_poem(&self, id: PoemId) -> Result<Option<PrivatePoem>, StoreError> {
        Ok(self.inner.read().await.poems.get(&id).map(|s| s.value.clone()))
    }

    async fn create_poem(&self, poem: NewPoem) -> Result<PrivatePoem, StoreError> {
        let mut inner = self.inner.write().await;
        let poem = poem.into_poem(Uuid::new_v4(), Utc::now());
        let seq = inner.next_seq();
        inner.poems.insert(
            poem.id,
            Stored {
                seq,
                value: poem.clone(),
            },
        );
        Ok(poem)
    }

    async fn update_poem(&self, id: PoemId, update: PoemUpdate) -> Result<Option<PrivatePoem>, StoreError> {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq();
        let Some(stored) = inner.poems.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(&mut stored.value, Utc::now());
        stored.seq = seq;
        Ok(Some(stored.value.clone()))
    }

    async fn delete_poem(&self, id: PoemId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.poems.remove(&id).is_some())
    }

    async fn poems_by_author(&self, author_nickname: &str) -> Result<Vec<PrivatePoem>, StoreError> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&Stored<PrivatePoem>> = inner
            .poems
            .values()
            .filter(|stored| stored.value.author_nickname == author_nickname)
            .collect();
        matched.sort_by(|a, b| (b.value.updated_at, b.seq).cmp(&(a.value.updated_at, a.seq)));
        Ok(matched.into_iter().map(|s| s.value.clone()).collect())
    }
}
