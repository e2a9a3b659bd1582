//! Forest Module
//!
//! The public forest of poetry trees: tree algorithms, node mutations, the
//! publish pipeline and the HTTP handlers on top of them.
//!
//! # Module Structure
//!
//! ```text
//! forest/
//! ├── mod.rs       - Module exports
//! ├── engine.rs    - TreeEngine: walks, materialization, deletion, random paths
//! ├── mutations.rs - Planting, appending and editing nodes
//! ├── publish.rs   - Text block to linear tree
//! └── handlers.rs  - Axum handlers for /api/trees, /api/tree and /api/nodes
//! ```

pub mod engine;
pub mod handlers;
pub mod mutations;
pub mod publish;

pub use engine::{render_path, DeletionReport, TreeEngine, DEFAULT_MAX_DEPTH};
