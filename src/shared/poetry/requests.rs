//! Request and response bodies of the JSON API
//!
//! Fields are `Option` on the way in so a missing field surfaces as a
//! `ValidationError` with a readable message rather than a body-parse
//! rejection.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use crate::shared::error::{require_text, SharedError};

/// Request to plant a new tree (create a root node)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTreeRequest {
    pub text: Option<String>,
    pub author: Option<String>,
}

impl CreateTreeRequest {
    /// Returns `(text, author)`
    pub fn validate(self) -> Result<(String, String), SharedError> {
        let text = require_text("text", self.text)?;
        let author = require_text("author", self.author)?;
        Ok((text, author))
    }
}

/// Request to append a line under an existing node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendNodeRequest {
    pub text: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
}

/// Validated append request
#[derive(Debug, Clone, PartialEq)]
pub struct AppendNode {
    pub text: String,
    pub author: String,
    pub is_anonymous: bool,
}

impl AppendNodeRequest {
    pub fn validate(self) -> Result<AppendNode, SharedError> {
        Ok(AppendNode {
            text: require_text("text", self.text)?,
            author: require_text("author", self.author)?,
            is_anonymous: self.is_anonymous.unwrap_or(false),
        })
    }
}

/// Request to replace the text of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditNodeRequest {
    pub text: Option<String>,
}

/// Request to save a new private draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoemRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_nickname: Option<String>,
}

/// Request to update a private draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePoemRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Request to publish a block of text as a new tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub content: Option<String>,
    pub author_nickname: Option<String>,
}

/// Response after a successful publish
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub msg: String,
    pub root_id: NodeId,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Query string of the draft listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoemQuery {
    pub author: Option<String>,
}

/// Output format of the random path route
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathFormat {
    #[default]
    Json,
    Text,
}

/// Query string of the random path route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub format: PathFormat,
}
