//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are returned by the Tree Engine, the Publish Pipeline and
//! the draft service, and are converted to HTTP responses at the edge.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! ├── conversion.rs - IntoResponse implementation and 404 fallback
//! └── rejection.rs  - Extractors that reject with BackendError
//! ```
//!
//! # Propagation
//!
//! Engine operations surface the most specific variant they can. Anything
//! the engine did not anticipate arrives as `StoreFailure` and becomes a
//! generic 500 response. Nothing is retried.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Extractor rejections as BackendError
pub mod rejection;

// Re-export commonly used types
pub use rejection::{ApiJson, ApiPath, ApiQuery};
pub use types::{BackendError, SERVER_ERROR_MESSAGE};

/// Result alias used throughout the backend
pub type BackendResult<T> = Result<T, BackendError>;
