/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the Tree Engine, the Publish
 * Pipeline and the draft service. Each variant maps onto one HTTP status
 * in `conversion`.
 *
 * # Error Categories
 *
 * ## Lookup Errors
 *
 * - `NotFound` - a referenced node or draft is absent
 * - `ParentNotFound` - the target of a child append is absent
 *
 * ## Input Errors
 *
 * - `SharedError` - a required field is missing or blank
 * - `EmptyContent` - a publish request without a single usable line
 *
 * ## Server Errors
 *
 * - `CorruptTree` - a cycle or runaway depth while walking a tree
 * - `StoreFailure` - the persistence layer failed; the cause is opaque
 *   to clients
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::{NodeId, SharedError};

/// Message sent to clients in place of any server-side failure detail
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// A node or draft referenced by the request does not exist
    #[error("{what} not found")]
    NotFound {
        /// What was looked up, e.g. "Node" or "Poem"
        what: String,
    },

    /// The node a child was to be appended under does not exist
    #[error("Parent node not found: {id}")]
    ParentNotFound {
        /// Requested parent ID
        id: NodeId,
    },

    /// Publish input had no non-blank lines
    #[error("No valid lines to publish")]
    EmptyContent,

    /// The child graph under a root is not a tree
    #[error("Corrupt tree at node {id}: {reason}")]
    CorruptTree {
        /// Node at which the walk gave up
        id: NodeId,
        /// Revisit or depth overflow
        reason: String,
    },

    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Persistence failure
    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),

    /// Request-level error raised directly by a handler
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn parent_not_found(id: NodeId) -> Self {
        Self::ParentNotFound { id }
    }

    pub fn corrupt_tree(id: NodeId, reason: impl Into<String>) -> Self {
        Self::CorruptTree {
            id,
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound`, `ParentNotFound` - 404 Not Found
    /// - `SharedError`, `EmptyContent` - 400 Bad Request
    /// - `CorruptTree`, `StoreFailure` - 500 Internal Server Error
    /// - `HandlerError` - Uses the status code from the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::ParentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::EmptyContent => StatusCode::BAD_REQUEST,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::CorruptTree { .. } | Self::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HandlerError { status, .. } => *status,
        }
    }

    /// Message safe to hand to clients
    ///
    /// Server-side failures collapse to a generic message; the full error
    /// is logged by the response conversion instead.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { .. } | Self::ParentNotFound { .. } | Self::EmptyContent => self.to_string(),
            Self::SharedError(err) => err.public_message(),
            Self::CorruptTree { .. } | Self::StoreFailure(_) => SERVER_ERROR_MESSAGE.to_string(),
            Self::HandlerError { message, .. } => message.clone(),
        }
    }
}
