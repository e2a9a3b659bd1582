//! Poetry Node Data Structure
//!
//! A `PoetryNode` is one line of verse in a forest of rooted trees. Edges
//! are stored forward only: a node knows its children, never its parent.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a poetry node, assigned by the store
pub type NodeId = Uuid;

/// One line of verse in a poetry tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoetryNode {
    /// Unique node ID
    #[serde(rename = "_id", alias = "id")]
    pub id: NodeId,
    /// The line of verse
    pub text: String,
    /// Free-text display name of whoever wrote the line
    pub author: String,
    /// Hide the author when displaying (still stored)
    #[serde(default)]
    pub is_anonymous: bool,
    /// True only for the entry point of a tree
    #[serde(default)]
    pub is_root: bool,
    /// HSL display hint, only set on roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Child node IDs in insertion order
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// When the node was created
    pub created_at: DateTime<Utc>,
}

impl PoetryNode {
    /// Author to show next to the line, `None` for anonymous lines
    pub fn display_author(&self) -> Option<&str> {
        if self.is_anonymous {
            None
        } else {
            Some(self.author.as_str())
        }
    }
}

/// Fields supplied when creating a node; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub text: String,
    pub author: String,
    pub is_anonymous: bool,
    pub is_root: bool,
    pub color: Option<String>,
}

impl NewNode {
    /// A new tree entry point
    pub fn root(text: impl Into<String>, author: impl Into<String>, color: String) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            is_anonymous: false,
            is_root: true,
            color: Some(color),
        }
    }

    /// A line that will be appended under an existing node
    pub fn child(text: impl Into<String>, author: impl Into<String>, is_anonymous: bool) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            is_anonymous,
            is_root: false,
            color: None,
        }
    }

    /// Materialize with store-assigned identity
    pub fn into_node(self, id: NodeId, created_at: DateTime<Utc>) -> PoetryNode {
        PoetryNode {
            id,
            text: self.text,
            author: self.author,
            is_anonymous: self.is_anonymous,
            is_root: self.is_root,
            color: self.color,
            children: Vec::new(),
            created_at,
        }
    }
}

/// Partial update of a node's mutable fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub text: Option<String>,
    pub children: Option<Vec<NodeId>>,
}

impl NodeUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn children(children: Vec<NodeId>) -> Self {
        Self {
            children: Some(children),
            ..Self::default()
        }
    }

    /// Apply the update in place
    pub fn apply(self, node: &mut PoetryNode) {
        if let Some(text) = self.text {
            node.text = text;
        }
        if let Some(children) = self.children {
            node.children = children;
        }
    }
}

/// A node with its children expanded into full nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(rename = "_id", alias = "id")]
    pub id: NodeId,
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    pub created_at: DateTime<Utc>,
}

impl TreeNode {
    /// Attach already-expanded children to a stored node
    pub fn from_node(node: PoetryNode, children: Vec<TreeNode>) -> Self {
        Self {
            id: node.id,
            text: node.text,
            author: node.author,
            is_anonymous: node.is_anonymous,
            is_root: node.is_root,
            color: node.color,
            children,
            created_at: node.created_at,
        }
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Leaf texts in document (pre-order, left to right) order
    pub fn leaf_texts(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                leaves.push(node.text.as_str());
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }
}

/// Saturation and lightness of the colors handed out to new roots.
///
/// Only the hue is random so every tree in the forest stays in the same
/// pastel register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslPalette {
    pub saturation: u8,
    pub lightness: u8,
}

impl HslPalette {
    /// Palette for trees planted directly in the forest
    pub const TREE: HslPalette = HslPalette {
        saturation: 70,
        lightness: 80,
    };

    /// Palette for trees published from a private draft
    pub const PUBLISHED: HslPalette = HslPalette {
        saturation: 80,
        lightness: 75,
    };

    /// Format a hue in this palette
    pub fn format(&self, hue: u16) -> String {
        format!("hsl({}, {}%, {}%)", hue % 360, self.saturation, self.lightness)
    }

    /// Draw a uniformly random hue in [0, 360)
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.format(rng.gen_range(0..360))
    }
}
