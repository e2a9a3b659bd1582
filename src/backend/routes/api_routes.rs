/**
 * Public API Routes
 *
 * # Routes
 *
 * ## Trees
 * - `GET /api/trees` - Root nodes, newest first
 * - `POST /api/trees` - Plant a new tree
 * - `GET /api/trees/full` - Every tree, fully expanded
 * - `GET /api/tree/{id}` - One tree, fully expanded
 * - `GET /api/trees/{root_id}/random-path` - Random root-to-leaf path
 *
 * ## Nodes
 * - `POST /api/nodes/{id}` - Append a child line
 * - `PUT /api/nodes/{id}` - Edit a line
 * - `DELETE /api/nodes/{id}` - Delete a line and its subtree
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::forest::handlers::{
    append_node, create_tree, delete_node, edit_node, full_trees, get_tree, list_trees, random_path,
};
use crate::backend::server::state::AppState;

/// Configure the public forest routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/trees", get(list_trees).post(create_tree))
        .route("/api/trees/full", get(full_trees))
        .route("/api/tree/{id}", get(get_tree))
        .route("/api/trees/{root_id}/random-path", get(random_path))
        .route(
            "/api/nodes/{id}",
            post(append_node).put(edit_node).delete(delete_node),
        )
}
