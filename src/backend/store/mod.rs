//! Store Module
//!
//! The Tree Engine and the draft service never talk to a database directly.
//! They consume two collaborator contracts:
//!
//! - **`NodeStore`** - fetch/create/update/delete/find over poetry nodes,
//!   plus atomic child-list edits and parent lookup
//! - **`PoemStore`** - CRUD over private drafts
//!
//! # Implementations
//!
//! - **`memory`** - `MemoryStore`, a `tokio::sync::RwLock` over hash maps
//!   with an explicit child → parent index. Used when `DATABASE_URL` is
//!   unset and by most tests.
//! - **`sqlite`** - `SqliteStore`, persistent storage through `sqlx`.
//!
//! Neither implementation offers multi-document transactions to callers.
//! Operations that touch two documents (append, cascading delete) order
//! their writes so an interruption never leaves a parent pointing at a
//! node that does not exist.

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::{NewNode, NewPoem, NodeId, NodeUpdate, PoemId, PoemUpdate, PoetryNode, PrivatePoem};

/// In-memory store
pub mod memory;

/// SQLite store
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be decoded
    #[error("corrupt record {id}: {message}")]
    CorruptRecord {
        /// ID of the offending record
        id: String,
        /// What was wrong with it
        message: String,
    },

    /// The backend refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn corrupt(id: impl ToString, message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            id: id.to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Predicate for `NodeStore::find_where`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFilter {
    pub is_root: Option<bool>,
    pub has_child: Option<NodeId>,
}

impl NodeFilter {
    /// Every node
    pub fn all() -> Self {
        Self::default()
    }

    /// Tree entry points
    pub fn roots() -> Self {
        Self {
            is_root: Some(true),
            ..Self::default()
        }
    }

    /// Nodes whose child list contains `child`
    pub fn parent_of(child: NodeId) -> Self {
        Self {
            has_child: Some(child),
            ..Self::default()
        }
    }

    pub fn matches(&self, node: &PoetryNode) -> bool {
        if let Some(is_root) = self.is_root {
            if node.is_root != is_root {
                return false;
            }
        }
        if let Some(child) = self.has_child {
            if !node.children.contains(&child) {
                return false;
            }
        }
        true
    }
}

/// Sort order for `NodeStore::find_where`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSort {
    CreatedAtDesc,
}

/// Document-store contract over poetry nodes
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Short name of the backend, for logs
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, id: NodeId) -> Result<Option<PoetryNode>, StoreError>;

    /// Persist a new node; the store assigns `id` and `created_at`
    async fn create(&self, node: NewNode) -> Result<PoetryNode, StoreError>;

    /// Returns the updated node, or `None` if it does not exist
    async fn update_fields(&self, id: NodeId, update: NodeUpdate) -> Result<Option<PoetryNode>, StoreError>;

    /// Returns `false` if the node did not exist
    async fn delete(&self, id: NodeId) -> Result<bool, StoreError>;

    /// Without a sort the order is unspecified but stable
    async fn find_where(&self, filter: NodeFilter, sort: Option<NodeSort>) -> Result<Vec<PoetryNode>, StoreError>;

    /// Append `child` to `parent`'s child list.
    ///
    /// Returns the updated parent or `None` if it is absent. Pushing an id
    /// that is already present leaves the list unchanged. The default is a
    /// read-modify-write; backends override it with an atomic version.
    async fn push_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        let Some(node) = self.get(parent).await? else {
            return Ok(None);
        };
        if node.children.contains(&child) {
            return Ok(Some(node));
        }
        let mut children = node.children;
        children.push(child);
        self.update_fields(parent, NodeUpdate::children(children)).await
    }

    /// Remove `child` from `parent`'s child list
    async fn pull_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        let Some(node) = self.get(parent).await? else {
            return Ok(None);
        };
        let children = node.children.into_iter().filter(|id| *id != child).collect();
        self.update_fields(parent, NodeUpdate::children(children)).await
    }

    /// The node whose child list contains `child`.
    ///
    /// The default scans the whole collection.
    async fn find_parent(&self, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
        Ok(self
            .find_where(NodeFilter::parent_of(child), None)
            .await?
            .into_iter()
            .next())
    }
}

/// Document-store contract over private drafts
#[async_trait]
pub trait PoemStore: Send + Sync {
    async fn get_poem(&self, id: PoemId) -> Result<Option<PrivatePoem>, StoreError>;

    async fn create_poem(&self, poem: NewPoem) -> Result<PrivatePoem, StoreError>;

    /// Applies the update and refreshes `updated_at`
    async fn update_poem(&self, id: PoemId, update: PoemUpdate) -> Result<Option<PrivatePoem>, StoreError>;

    async fn delete_poem(&self, id: PoemId) -> Result<bool, StoreError>;

    /// Drafts of one nickname, most recently updated first
    async fn poems_by_author(&self, author_nickname: &str) -> Result<Vec<PrivatePoem>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_filter_matches() {
        let child = Uuid::new_v4();
        let mut root = NewNode::root("a", "b", "hsl(0, 70%, 80%)".into()).into_node(Uuid::new_v4(), Utc::now());
        root.children.push(child);
        let leaf = NewNode::child("c", "d", false).into_node(child, Utc::now());

        assert!(NodeFilter::all().matches(&root));
        assert!(NodeFilter::roots().matches(&root));
        assert!(!NodeFilter::roots().matches(&leaf));
        assert!(NodeFilter::parent_of(child).matches(&root));
        assert!(!NodeFilter::parent_of(child).matches(&leaf));
    }
}
