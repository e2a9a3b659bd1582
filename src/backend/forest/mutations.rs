//! Node mutations
//!
//! Planting roots, appending children and editing text. Each operation
//! validates its input, talks to the store, and returns the stored node.

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::forest::engine::TreeEngine;
use crate::shared::error::require_text;
use crate::shared::poetry::AppendNode;
use crate::shared::{HslPalette, NewNode, NodeId, NodeUpdate, PoetryNode};

/// Reject absent or whitespace-only input with a readable message
pub(crate) fn ensure_text(field: &str, label: &str, value: &str) -> BackendResult<()> {
    if value.trim().is_empty() {
        return Err(BackendError::validation(field, format!("{} is required", label)));
    }
    Ok(())
}

impl TreeEngine {
    /// Create a root node colored from `palette`
    pub(crate) async fn plant(
        &self,
        text: String,
        author: String,
        palette: HslPalette,
    ) -> BackendResult<PoetryNode> {
        // The rng must not live across the await below
        let color = palette.pick(&mut rand::thread_rng());
        let root = self.store().create(NewNode::root(text, author, color)).await?;
        tracing::info!("[Forest] Planted tree {} ({})", root.id, root.color.as_deref().unwrap_or("-"));
        Ok(root)
    }

    /// Start a new tree from a single line
    pub async fn create_root(&self, text: String, author: String) -> BackendResult<PoetryNode> {
        ensure_text("text", "Text", &text)?;
        ensure_text("author", "Author", &author)?;
        self.plant(text, author, HslPalette::TREE).await
    }

    /// Append a line under `parent_id`.
    ///
    /// The child is stored first and then pushed onto the parent's child
    /// list in one atomic step. If the parent disappears in between, the
    /// orphaned child is removed again and the call fails.
    pub async fn append_child(&self, parent_id: NodeId, append: AppendNode) -> BackendResult<PoetryNode> {
        ensure_text("text", "Text", &append.text)?;
        ensure_text("author", "Author", &append.author)?;

        if self.store().get(parent_id).await?.is_none() {
            return Err(BackendError::parent_not_found(parent_id));
        }

        let child = self
            .store()
            .create(NewNode::child(append.text, append.author, append.is_anonymous))
            .await?;

        if self.store().push_child(parent_id, child.id).await?.is_none() {
            tracing::warn!("[Forest] Parent {} vanished during append, dropping {}", parent_id, child.id);
            if let Err(err) = self.store().delete(child.id).await {
                tracing::error!("[Forest] Failed to drop orphan {}: {}", child.id, err);
            }
            return Err(BackendError::parent_not_found(parent_id));
        }

        tracing::debug!("[Forest] Appended {} under {}", child.id, parent_id);
        Ok(child)
    }

    /// Replace the text of a node, leaving everything else as is
    pub async fn edit_text(&self, id: NodeId, text: Option<String>) -> BackendResult<PoetryNode> {
        let text = require_text("text", text)?;

        self.store()
            .update_fields(id, NodeUpdate::text(text))
            .await?
            .ok_or_else(|| BackendError::not_found("Node"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::forest::engine::DEFAULT_MAX_DEPTH;
    use crate::backend::store::{MemoryStore, NodeStore};
    use crate::shared::SharedError;
    use std::sync::Arc;

    fn engine() -> (TreeEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TreeEngine::new(store.clone(), DEFAULT_MAX_DEPTH), store)
    }

    fn append(text: &str, anonymous: bool) -> AppendNode {
        AppendNode {
            text: text.to_string(),
            author: "wren".to_string(),
            is_anonymous: anonymous,
        }
    }

    #[tokio::test]
    async fn test_create_root_uses_tree_palette() {
        let (engine, _) = engine();
        let root = engine.create_root("first light".into(), "wren".into()).await.unwrap();
        assert!(root.is_root);
        assert!(root.children.is_empty());
        let color = root.color.unwrap();
        assert!(color.starts_with("hsl(") && color.ends_with(", 70%, 80%)"), "{color}");
    }

    #[tokio::test]
    async fn test_create_root_rejects_blank_text() {
        let (engine, store) = engine();
        let err = engine.create_root("   ".into(), "wren".into()).await.unwrap_err();
        assert_eq!(err.message(), "Text is required");
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_append_links_child() {
        let (engine, store) = engine();
        let root = engine.create_root("root".into(), "wren".into()).await.unwrap();
        let child = engine.append_child(root.id, append("next", true)).await.unwrap();

        assert!(!child.is_root);
        assert!(child.is_anonymous);
        assert!(child.color.is_none());
        let root = store.get(root.id).await.unwrap().unwrap();
        assert_eq!(root.children, vec![child.id]);
    }

    #[tokio::test]
    async fn test_append_to_missing_parent_creates_nothing() {
        let (engine, store) = engine();
        let err = engine
            .append_child(NodeId::new_v4(), append("lost", false))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ParentNotFound { .. }));
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_edit_text_keeps_structure() {
        let (engine, _) = engine();
        let root = engine.create_root("root".into(), "wren".into()).await.unwrap();
        let child = engine.append_child(root.id, append("draft", false)).await.unwrap();

        let edited = engine.edit_text(child.id, Some("final".into())).await.unwrap();
        assert_eq!(edited.text, "final");
        assert_eq!(edited.author, child.author);
        assert_eq!(edited.created_at, child.created_at);
    }

    #[tokio::test]
    async fn test_edit_text_errors() {
        let (engine, _) = engine();
        let err = engine.edit_text(NodeId::new_v4(), None).await.unwrap_err();
        assert_eq!(err.message(), "Text is required");

        let err = engine.edit_text(NodeId::new_v4(), Some("x".into())).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_edit_text_rejects_empty_and_keeps_old_text() {
        let (engine, store) = engine();
        let root = engine.create_root("keep me".into(), "wren".into()).await.unwrap();

        for blank in ["", "   "] {
            let err = engine.edit_text(root.id, Some(blank.into())).await.unwrap_err();
            assert!(matches!(
                err,
                BackendError::SharedError(SharedError::ValidationError { ref field, .. }) if field == "text"
            ));
            assert_eq!(err.message(), "Text cannot be empty");
        }
        assert_eq!(store.get(root.id).await.unwrap().unwrap().text, "keep me");
    }
}
