/**
 * Forest Handlers
 *
 * HTTP handlers for the public forest:
 * - GET    /api/trees                           - list roots, newest first
 * - POST   /api/trees                           - plant a new tree
 * - GET    /api/trees/full                      - every tree, fully expanded
 * - GET    /api/tree/{id}                       - one tree, fully expanded
 * - GET    /api/trees/{root_id}/random-path     - a random root-to-leaf path
 * - POST   /api/nodes/{id}                      - append a child line
 * - PUT    /api/nodes/{id}                      - edit a line
 * - DELETE /api/nodes/{id}                      - delete a line and everything under it
 */

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::{ApiJson, ApiPath, ApiQuery, BackendError, BackendResult};
use crate::backend::forest::engine::{render_path, TreeEngine};
use crate::shared::poetry::{
    AppendNodeRequest, CreateTreeRequest, EditNodeRequest, MessageResponse, PathFormat, PathQuery,
};
use crate::shared::{NodeId, PoetryNode, TreeNode};

/// GET /api/trees
pub async fn list_trees(State(engine): State<TreeEngine>) -> BackendResult<Json<Vec<PoetryNode>>> {
    Ok(Json(engine.list_roots().await?))
}

/// POST /api/trees
pub async fn create_tree(
    State(engine): State<TreeEngine>,
    ApiJson(request): ApiJson<CreateTreeRequest>,
) -> BackendResult<Json<PoetryNode>> {
    let (text, author) = request.validate()?;
    Ok(Json(engine.create_root(text, author).await?))
}

/// GET /api/trees/full
pub async fn full_trees(State(engine): State<TreeEngine>) -> BackendResult<Json<Vec<TreeNode>>> {
    Ok(Json(engine.materialize_forest().await?))
}

/// GET /api/tree/{id}
pub async fn get_tree(
    State(engine): State<TreeEngine>,
    ApiPath(id): ApiPath<NodeId>,
) -> BackendResult<Json<TreeNode>> {
    Ok(Json(engine.materialize(id).await?))
}

/// GET /api/trees/{root_id}/random-path
///
/// `?format=text` renders the path as plain verse instead of JSON.
pub async fn random_path(
    State(engine): State<TreeEngine>,
    ApiPath(root_id): ApiPath<NodeId>,
    ApiQuery(query): ApiQuery<PathQuery>,
) -> BackendResult<Response> {
    let path = engine.random_path(root_id).await?;
    Ok(match query.format {
        PathFormat::Json => Json(path).into_response(),
        PathFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_path(&path),
        )
            .into_response(),
    })
}

/// POST /api/nodes/{id}
pub async fn append_node(
    State(engine): State<TreeEngine>,
    ApiPath(parent_id): ApiPath<NodeId>,
    ApiJson(request): ApiJson<AppendNodeRequest>,
) -> BackendResult<Json<PoetryNode>> {
    let append = request.validate()?;
    Ok(Json(engine.append_child(parent_id, append).await?))
}

/// PUT /api/nodes/{id}
pub async fn edit_node(
    State(engine): State<TreeEngine>,
    ApiPath(id): ApiPath<NodeId>,
    ApiJson(request): ApiJson<EditNodeRequest>,
) -> BackendResult<Json<PoetryNode>> {
    Ok(Json(engine.edit_text(id, request.text).await?))
}

/// DELETE /api/nodes/{id}
pub async fn delete_node(
    State(engine): State<TreeEngine>,
    ApiPath(id): ApiPath<NodeId>,
) -> BackendResult<Json<MessageResponse>> {
    let report = engine.delete_subtree(id).await?;
    if report.is_noop() {
        return Err(BackendError::not_found("Node"));
    }
    Ok(Json(MessageResponse::new("Node hierarchy deleted successfully")))
}
