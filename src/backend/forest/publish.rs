/**
 * Publish Pipeline
 *
 * Turns a multi-line text block into a brand-new linear tree: the first
 * non-blank line becomes a root in the published palette, every following
 * line becomes the single child of the line before it.
 *
 * Each child is stored before it is linked to its predecessor, so a
 * failure part way leaves a shorter chain behind, never a dangling link.
 */

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::forest::engine::TreeEngine;
use crate::backend::forest::mutations::ensure_text;
use crate::shared::poetry::verse_lines;
use crate::shared::{HslPalette, NewNode, NodeId};

impl TreeEngine {
    /// Publish `content` as a new tree and return the id of its root
    pub async fn publish(&self, content: &str, author: &str) -> BackendResult<NodeId> {
        let lines = verse_lines(content);
        let Some((first, rest)) = lines.split_first() else {
            return Err(BackendError::EmptyContent);
        };
        ensure_text("authorNickname", "Author nickname", author)?;

        let root = self
            .plant(first.to_string(), author.to_string(), HslPalette::PUBLISHED)
            .await?;

        let mut previous = root.id;
        for line in rest {
            let child = self
                .store()
                .create(NewNode::child(*line, author, false))
                .await?;
            if self.store().push_child(previous, child.id).await?.is_none() {
                // The chain was deleted while it was still being written
                tracing::warn!("[Forest] Publish chain broke at {}, dropping {}", previous, child.id);
                if let Err(err) = self.store().delete(child.id).await {
                    tracing::error!("[Forest] Failed to drop orphan {}: {}", child.id, err);
                }
                return Err(BackendError::parent_not_found(previous));
            }
            previous = child.id;
        }

        tracing::info!("[Forest] Published {} line(s) as tree {}", lines.len(), root.id);
        Ok(root.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::forest::engine::DEFAULT_MAX_DEPTH;
    use crate::backend::store::{MemoryStore, NodeFilter, NodeSort, NodeStore, StoreError};
    use crate::shared::{NodeUpdate, PoetryNode};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Deletes the parent just before every push, as a concurrent delete would
    struct SeveredStore(Arc<MemoryStore>);

    #[async_trait]
    impl NodeStore for SeveredStore {
        fn backend_tag(&self) -> &'static str {
            "severed"
        }

        async fn get(&self, id: NodeId) -> Result<Option<PoetryNode>, StoreError> {
            self.0.get(id).await
        }

        async fn create(&self, node: NewNode) -> Result<PoetryNode, StoreError> {
            self.0.create(node).await
        }

        async fn update_fields(&self, id: NodeId, update: NodeUpdate) -> Result<Option<PoetryNode>, StoreError> {
            self.0.update_fields(id, update).await
        }

        async fn delete(&self, id: NodeId) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }

        async fn find_where(&self, filter: NodeFilter, sort: Option<NodeSort>) -> Result<Vec<PoetryNode>, StoreError> {
            self.0.find_where(filter, sort).await
        }

        async fn push_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>, StoreError> {
            self.0.delete(parent).await?;
            self.0.push_child(parent, child).await
        }
    }

    fn engine() -> (TreeEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TreeEngine::new(store.clone(), DEFAULT_MAX_DEPTH), store)
    }

    #[tokio::test]
    async fn test_publish_builds_linear_chain() {
        let (engine, _) = engine();
        let root_id = engine.publish("L1\n\n  \nL2\nL3", "kite").await.unwrap();

        let tree = engine.materialize(root_id).await.unwrap();
        assert_eq!(tree.text, "L1");
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.children[0].text, "L2");
        assert_eq!(tree.children[0].children[0].text, "L3");
        assert!(tree.color.as_deref().unwrap().ends_with(", 80%, 75%)"));
        assert!(!tree.children[0].is_anonymous);
        assert_eq!(tree.children[0].children[0].author, "kite");
    }

    #[tokio::test]
    async fn test_publish_single_line() {
        let (engine, _) = engine();
        let root_id = engine.publish("only", "kite").await.unwrap();
        let tree = engine.materialize(root_id).await.unwrap();
        assert!(tree.children.is_empty());
    }

    #[tokio::test]
    async fn test_publish_blank_content_writes_nothing() {
        let (engine, store) = engine();
        for content in ["", "\n \n\t"] {
            let err = engine.publish(content, "kite").await.unwrap_err();
            assert!(matches!(err, BackendError::EmptyContent));
        }
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_publish_requires_author() {
        let (engine, store) = engine();
        let err = engine.publish("a line", " ").await.unwrap_err();
        assert_eq!(err.message(), "Author nickname is required");
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_broken_chain_drops_the_unlinked_line() {
        let memory = Arc::new(MemoryStore::new());
        let engine = TreeEngine::new(Arc::new(SeveredStore(memory.clone())), DEFAULT_MAX_DEPTH);

        let err = engine.publish("first\nsecond", "kite").await.unwrap_err();
        assert!(matches!(err, BackendError::ParentNotFound { .. }));
        assert_eq!(memory.node_count().await, 0);
    }
}
