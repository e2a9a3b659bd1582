/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - the `TreeEngine` serving the public forest
 * - the `DraftService` serving private drafts and publishing
 * - the resolved `ServerConfig`
 *
 * Both services hold their store behind an `Arc<dyn ...>`, so cloning the
 * state per request is cheap and every clone sees the same data.
 *
 * # State Extraction
 *
 * Handlers ask for exactly the service they need:
 *
 * ```rust,ignore
 * async fn handler(State(engine): State<TreeEngine>) { /* ... */ }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::drafts::DraftService;
use crate::backend::forest::TreeEngine;
use crate::backend::server::config::ServerConfig;

/// Central state container of the Axum application
#[derive(Clone)]
pub struct AppState {
    pub engine: TreeEngine,
    pub drafts: DraftService,
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for TreeEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.engine.clone()
    }
}

impl FromRef<AppState> for DraftService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.drafts.clone()
    }
}
