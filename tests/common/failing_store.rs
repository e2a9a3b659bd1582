//! A `NodeStore` wrapper that fails on demand
//!
//! Delegates to a `MemoryStore` and returns `StoreError::Unavailable` from
//! the n-th `delete` call (1-based) and every call after it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use poetree::backend::store::{MemoryStore, NodeFilter, NodeSort, NodeStore, StoreError};
use poetree::shared::{NewNode, NodeId, NodeUpdate, PoetryNode};

pub struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_on_delete: usize,
    deletes: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, fail_on_delete: usize) -> Self {
        Self {
            inner,
            fail_on_delete,
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn deletes_attempted(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeStore for FailingStore {
    fn backend_tag(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, id: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        self.inner.get(id).await
    }

    async fn create(&self, node: NewNode) -> Result<PoetryNode, StoreError> {
        self.inner.create(node).await
    }

    async fn update_fields(&self, id: NodeId, update: NodeUpdate) -> Result<Option<PoetryNode>, StoreError> {
        self.inner.update_fields(id, update).await
    }

    async fn delete(&self, id: NodeId) -> Result<bool, StoreError> {
        let attempt = self.deletes.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt >= self.fail_on_delete {
            return Err(StoreError::unavailable("injected delete failure"));
        }
        self.inner.delete(id).await
    }

    async fn find_where(&self, filter: NodeFilter, sort: Option<NodeSort>) -> Result<Vec<PoetryNode>, StoreError> {
        self.inner.find_where(filter, sort).await
    }

    async fn push_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        self.inner.push_child(parent, child).await
    }

    async fn pull_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        self.inner.pull_child(parent, child).await
    }

    async fn find_parent(&self, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        self.inner.find_parent(child).await
    }
}
