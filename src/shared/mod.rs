//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and any client of the JSON API (the single-page frontend,
//! integration tests, tooling). Everything here is plain data plus
//! validation; nothing touches the network or the store.
//!
//! # Overview
//!
//! - **`poetry`** - Poetry nodes, materialized trees, private drafts and the
//!   request/response bodies of the HTTP surface
//! - **`error`** - Validation and serialization errors

/// Poetry tree and draft data structures
pub mod poetry;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use poetry::{
    HslPalette, NewNode, NewPoem, NodeId, NodeUpdate, PoemId, PoemUpdate, PoetryNode,
    PrivatePoem, TreeNode,
};
