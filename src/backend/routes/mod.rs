//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation, layers and fallback
//! ├── api_routes.rs     - Public forest: trees and nodes
//! └── private_routes.rs - Private drafts and publishing
//! ```
//!
//! # Response Conventions
//!
//! Successful calls return the resource as JSON. Failures return
//! `{"error": ..., "status": ...}` with the matching status code, see
//! `backend::error`.

/// Main router creation
pub mod router;

/// Public forest routes
pub mod api_routes;

/// Private draft routes
pub mod private_routes;

// Re-export commonly used functions
pub use router::create_router;
