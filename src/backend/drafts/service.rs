//! Draft service
//!
//! Private poems keyed by the author's self-declared nickname. Nothing here
//! authenticates the caller; knowing the nickname or a poem id is enough.

use std::sync::Arc;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::forest::TreeEngine;
use crate::backend::store::PoemStore;
use crate::shared::error::require_text;
use crate::shared::poetry::{CreatePoemRequest, PublishRequest, UpdatePoemRequest};
use crate::shared::{NewPoem, NodeId, PoemId, PoemUpdate, PrivatePoem};

/// Private drafts plus the bridge into the public forest
#[derive(Clone)]
pub struct DraftService {
    poems: Arc<dyn PoemStore>,
    engine: TreeEngine,
}

impl DraftService {
    pub fn new(poems: Arc<dyn PoemStore>, engine: TreeEngine) -> Self {
        Self { poems, engine }
    }

    /// Drafts of one author, most recently updated first
    pub async fn list(&self, author: Option<String>) -> BackendResult<Vec<PrivatePoem>> {
        let author = author
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| BackendError::validation("author", "Author nickname is required"))?;
        Ok(self.poems.poems_by_author(&author).await?)
    }

    pub async fn create(&self, request: CreatePoemRequest) -> BackendResult<PrivatePoem> {
        let author = require_text("authorNickname", request.author_nickname)
            .map_err(|_| BackendError::validation("authorNickname", "Author nickname is required"))?;
        let poem = self
            .poems
            .create_poem(NewPoem::new(request.title, request.content, author))
            .await?;
        tracing::info!("[Drafts] Saved draft {} for {}", poem.id, poem.author_nickname);
        Ok(poem)
    }

    /// Overwrite title and/or content; fields left out stay as they are
    pub async fn update(&self, id: PoemId, request: UpdatePoemRequest) -> BackendResult<PrivatePoem> {
        let update = PoemUpdate {
            title: request.title,
            content: request.content,
        };
        self.poems
            .update_poem(id, update)
            .await?
            .ok_or_else(|| BackendError::not_found("Poem"))
    }

    pub async fn delete(&self, id: PoemId) -> BackendResult<()> {
        if !self.poems.delete_poem(id).await? {
            return Err(BackendError::not_found("Poem"));
        }
        tracing::info!("[Drafts] Deleted draft {}", id);
        Ok(())
    }

    /// Publish free text straight into the forest
    pub async fn publish(&self, request: PublishRequest) -> BackendResult<NodeId> {
        let content = request.content.unwrap_or_default();
        let author = request.author_nickname.unwrap_or_default();
        self.engine.publish(&content, &author).await
    }

    /// Publish a stored draft. The draft itself is kept.
    pub async fn publish_draft(&self, id: PoemId) -> BackendResult<NodeId> {
        let poem = self
            .poems
            .get_poem(id)
            .await?
            .ok_or_else(|| BackendError::not_found("Poem"))?;
        let root_id = self.engine.publish(&poem.content, &poem.author_nickname).await?;
        tracing::info!("[Drafts] Draft {} published as tree {}", id, root_id);
        Ok(root_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::forest::DEFAULT_MAX_DEPTH;
    use crate::backend::store::MemoryStore;

    fn service() -> DraftService {
        let store = Arc::new(MemoryStore::new());
        DraftService::new(store.clone(), TreeEngine::new(store, DEFAULT_MAX_DEPTH))
    }

    fn draft(content: &str) -> CreatePoemRequest {
        CreatePoemRequest {
            title: None,
            content: Some(content.to_string()),
            author_nickname: Some("moth".to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_requires_author() {
        let drafts = service();
        let err = drafts.list(None).await.unwrap_err();
        assert_eq!(err.message(), "Author nickname is required");
        assert!(drafts.list(Some("moth".into())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_title() {
        let drafts = service();
        let poem = drafts.create(draft("one\ntwo")).await.unwrap();
        assert_eq!(poem.title, "Untitled");
        assert_eq!(drafts.list(Some("moth".into())).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let drafts = service();
        let missing = PoemId::new_v4();
        let err = drafts.update(missing, UpdatePoemRequest::default()).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
        let err = drafts.delete(missing).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_publish_draft_keeps_draft() {
        let drafts = service();
        let poem = drafts.create(draft("first\nsecond")).await.unwrap();
        let root_id = drafts.publish_draft(poem.id).await.unwrap();

        let tree = drafts.engine.materialize(root_id).await.unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.author, "moth");
        assert_eq!(drafts.list(Some("moth".into())).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_empty_content() {
        let drafts = service();
        let err = drafts
            .publish(PublishRequest {
                content: Some("\n\n".into()),
                author_nickname: Some("moth".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::EmptyContent));
    }
}
