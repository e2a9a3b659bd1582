/**
 * Draft Handlers
 *
 * - GET    /api/private/poems?author=     - list an author's drafts
 * - POST   /api/private/poems             - save a draft
 * - PUT    /api/private/poems/{id}        - update a draft
 * - DELETE /api/private/poems/{id}        - delete a draft
 * - POST   /api/private/publish           - publish free text as a new tree
 * - POST   /api/private/poems/{id}/publish - publish a saved draft
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::backend::drafts::service::DraftService;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, BackendResult};
use crate::shared::poetry::{
    CreatePoemRequest, MessageResponse, PoemQuery, PublishRequest, PublishResponse, UpdatePoemRequest,
};
use crate::shared::{NodeId, PoemId, PrivatePoem};

const PUBLISHED_MESSAGE: &str = "Successfully published to the public square!";

fn published(root_id: NodeId) -> (StatusCode, Json<PublishResponse>) {
    (
        StatusCode::CREATED,
        Json(PublishResponse {
            msg: PUBLISHED_MESSAGE.to_string(),
            root_id,
        }),
    )
}

pub async fn list_poems(
    State(drafts): State<DraftService>,
    ApiQuery(query): ApiQuery<PoemQuery>,
) -> BackendResult<Json<Vec<PrivatePoem>>> {
    Ok(Json(drafts.list(query.author).await?))
}

pub async fn create_poem(
    State(drafts): State<DraftService>,
    ApiJson(request): ApiJson<CreatePoemRequest>,
) -> BackendResult<Json<PrivatePoem>> {
    Ok(Json(drafts.create(request).await?))
}

pub async fn update_poem(
    State(drafts): State<DraftService>,
    ApiPath(id): ApiPath<PoemId>,
    ApiJson(request): ApiJson<UpdatePoemRequest>,
) -> BackendResult<Json<PrivatePoem>> {
    Ok(Json(drafts.update(id, request).await?))
}

pub async fn delete_poem(
    State(drafts): State<DraftService>,
    ApiPath(id): ApiPath<PoemId>,
) -> BackendResult<Json<MessageResponse>> {
    drafts.delete(id).await?;
    Ok(Json(MessageResponse::new("Poem deleted")))
}

pub async fn publish_text(
    State(drafts): State<DraftService>,
    ApiJson(request): ApiJson<PublishRequest>,
) -> BackendResult<(StatusCode, Json<PublishResponse>)> {
    Ok(published(drafts.publish(request).await?))
}

pub async fn publish_poem(
    State(drafts): State<DraftService>,
    ApiPath(id): ApiPath<PoemId>,
) -> BackendResult<(StatusCode, Json<PublishResponse>)> {
    Ok(published(drafts.publish_draft(id).await?))
}
