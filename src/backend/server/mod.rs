//! Server Module
//!
//! Everything needed to turn a `ServerConfig` into a running Axum router.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Defaults, TOML file and environment layering
//! └── init.rs         - Store selection and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, then `POETREE_CONFIG`, then env
//! 2. **Store Opening**: in-memory or SQLite, per `DATABASE_URL`
//! 3. **State Creation**: Tree Engine and draft service share the store
//! 4. **Router Creation**: routes, CORS, tracing and the 404 fallback

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{ConfigError, ServerConfig, StoreLocation};
pub use init::{build_state, create_app, open_stores, InitError, Stores};
pub use state::AppState;
