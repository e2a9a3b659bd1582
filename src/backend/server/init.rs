/**
 * Server Initialization
 *
 * This module opens the configured store, wires the services into an
 * `AppState` and hands that to the router.
 *
 * # Initialization Process
 *
 * 1. Resolve `database_url` to a store location
 * 2. Open the store (SQLite creates its schema on first use)
 * 3. Build the Tree Engine and the draft service over that store
 * 4. Create and configure the router
 */

use axum::Router;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::drafts::DraftService;
use crate::backend::forest::TreeEngine;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{ConfigError, ServerConfig, StoreLocation};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, NodeStore, PoemStore, SqliteStore, StoreError};

/// Startup failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

/// Both store contracts backed by the same storage
pub struct Stores {
    pub nodes: Arc<dyn NodeStore>,
    pub poems: Arc<dyn PoemStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            nodes: store.clone(),
            poems: store,
        }
    }
}

/// Open the store described by `config`
pub async fn open_stores(config: &ServerConfig) -> Result<Stores, InitError> {
    match config.store_location()? {
        StoreLocation::Memory => {
            tracing::warn!("[STARTUP] DATABASE_URL not set, using the in-memory store; data will not survive a restart");
            Ok(Stores::memory())
        }
        StoreLocation::Sqlite(url) => {
            tracing::info!("[STARTUP] Opening SQLite store at {}", url);
            let store = Arc::new(SqliteStore::connect(&url).await?);
            Ok(Stores {
                nodes: store.clone(),
                poems: store,
            })
        }
    }
}

/// Wire services over already-open stores
pub fn build_state(stores: Stores, config: ServerConfig) -> AppState {
    let engine = TreeEngine::new(stores.nodes, config.max_tree_depth);
    let drafts = DraftService::new(stores.poems, engine.clone());
    tracing::info!(
        "[STARTUP] Using {} store, max tree depth {}",
        engine.store().backend_tag(),
        engine.max_depth()
    );
    AppState {
        engine,
        drafts,
        config: Arc::new(config),
    }
}

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, InitError> {
    let stores = open_stores(&config).await?;
    Ok(create_router(build_state(stores, config)))
}
