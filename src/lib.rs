//! Poetree - Main Library
//!
//! Poetree is a collaborative poetry service. Anyone can plant a tree with a
//! single line; anyone can grow it by appending a line under any existing
//! line, so every root-to-leaf path reads as one poem. Authors also keep
//! private drafts and publish them into the forest as new linear trees.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and API clients
//!   - Poetry nodes, materialized trees, private drafts
//!   - Request and response bodies
//!   - Validation errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and JSON API
//!   - Tree Engine: materialization, cascading delete, random paths
//!   - Publish pipeline and private drafts
//!   - In-memory and SQLite stores
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend and the `poetree-server`
//!   binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use poetree::backend::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation and serialization failures
//! - `backend::BackendError` for everything the server can report, each
//!   variant mapped to one HTTP status

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
