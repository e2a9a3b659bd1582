//! Private draft routes
//!
//! Everything under `/api/private`. The nickname in the request is the only
//! notion of ownership.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::drafts::handlers::{
    create_poem, delete_poem, list_poems, publish_poem, publish_text, update_poem,
};
use crate::backend::server::state::AppState;

pub fn configure_private_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/private/poems", get(list_poems).post(create_poem))
        .route("/api/private/poems/{id}", put(update_poem).delete(delete_poem))
        .route("/api/private/poems/{id}/publish", post(publish_poem))
        .route("/api/private/publish", post(publish_text))
}
