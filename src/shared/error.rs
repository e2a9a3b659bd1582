//! Shared Error Types
//!
//! This module defines error types that are shared between the server and
//! API clients. These errors represent request-level failures that can be
//! detected without consulting the store.
//!
//! # Error Categories
//!
//! - `ValidationError` - A required field is missing or blank
//!
//! # Usage
//!
//! ```rust
//! use poetree::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "Text is required");
//! assert!(error.to_string().contains("text"));
//! ```
use thiserror::Error;

/// Shared error types that can occur on either side of the API
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short message suitable for an HTTP error body
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
        }
    }
}

/// Require a present, non-blank string field.
///
/// Returns the value untouched (no trimming) so verse indentation survives.
pub fn require_text(field: &str, value: Option<String>) -> Result<String, SharedError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(SharedError::validation(field, format!("{} cannot be empty", capitalize(field)))),
        None => Err(SharedError::validation(field, format!("{} is required", capitalize(field)))),
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("text", "Text is required");
        assert_eq!(error.to_string(), "Validation error in field 'text': Text is required");
        let SharedError::ValidationError { field, message } = error;
        assert_eq!(field, "text");
        assert_eq!(message, "Text is required");
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("text", Some("  indented".into())).unwrap(), "  indented");
        assert_eq!(
            require_text("text", Some("   ".into())).unwrap_err().public_message(),
            "Text cannot be empty"
        );
        assert_eq!(
            require_text("author", None).unwrap_err().public_message(),
            "Author is required"
        );
    }
}
