//! Backend Module
//!
//! All server-side code of Poetree: the Axum HTTP server, the Tree Engine
//! over the public forest, private drafts, and the stores behind them.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`forest`** - Tree Engine, node mutations, publish pipeline, handlers
//! - **`drafts`** - Private drafts and the publish bridge
//! - **`store`** - `NodeStore` / `PoemStore` contracts, memory and SQLite
//! - **`middleware`** - Request logging
//! - **`error`** - Backend error taxonomy and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── forest/         - Public poetry trees
//! ├── drafts/         - Private drafts
//! ├── store/          - Persistence
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Concurrency
//!
//! Requests run concurrently against one shared store. Child appends are a
//! single atomic store operation, so simultaneous appends to the same
//! parent never lose an edge. Nothing spans multiple documents
//! transactionally; multi-step operations order their writes so that an
//! interruption leaves unreachable nodes rather than dangling references.

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Public forest of poetry trees
#[cfg(feature = "ssr")]
pub mod forest;

/// Private drafts
#[cfg(feature = "ssr")]
pub mod drafts;

/// Node and draft persistence
#[cfg(feature = "ssr")]
pub mod store;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use error::{BackendError, BackendResult};
#[cfg(feature = "ssr")]
pub use forest::TreeEngine;
#[cfg(feature = "ssr")]
pub use server::{create_app, ServerConfig};
