//! Private Poem Data Structure
//!
//! Drafts are flat, newline-delimited texts owned by a nickname. They are
//! unrelated to the tree structure until published.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a private poem, assigned by the store
pub type PoemId = Uuid;

/// Title given to drafts saved without one
pub const DEFAULT_TITLE: &str = "Untitled";

/// A private draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivatePoem {
    #[serde(rename = "_id", alias = "id")]
    pub id: PoemId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_nickname: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Split a block of text into its non-blank lines.
///
/// Handles both `\n` and `\r\n`; lines consisting only of whitespace are
/// dropped, other lines are kept verbatim.
pub fn verse_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Fields supplied when creating a draft
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoem {
    pub title: String,
    pub content: String,
    pub author_nickname: String,
}

impl NewPoem {
    pub fn new(title: Option<String>, content: Option<String>, author_nickname: impl Into<String>) -> Self {
        Self {
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: content.unwrap_or_default(),
            author_nickname: author_nickname.into(),
        }
    }

    pub fn into_poem(self, id: PoemId, now: DateTime<Utc>) -> PrivatePoem {
        PrivatePoem {
            id,
            title: self.title,
            content: self.content,
            author_nickname: self.author_nickname,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a draft; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoemUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PoemUpdate {
    /// Apply the update and refresh `updated_at`
    pub fn apply(self, poem: &mut PrivatePoem, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            poem.title = title;
        }
        if let Some(content) = self.content {
            poem.content = content;
        }
        poem.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_lines_drops_blank_lines() {
        let lines = verse_lines("line one\n\nline two\n   \nline three");
        assert_eq!(lines, vec!["line one", "line two", "line three"]);
    }

    #[test]
    fn test_verse_lines_handles_crlf_and_keeps_indent() {
        let lines = verse_lines("  first\r\n\r\nsecond\r\n");
        assert_eq!(lines, vec!["  first", "second"]);
        assert!(verse_lines("   \n  ").is_empty());
        assert!(verse_lines("").is_empty());
    }

    #[test]
    fn test_new_poem_defaults() {
        let poem = NewPoem::new(None, None, "wren");
        assert_eq!(poem.title, DEFAULT_TITLE);
        assert_eq!(poem.content, "");

        let blank_title = NewPoem::new(Some("  ".into()), Some("x".into()), "wren");
        assert_eq!(blank_title.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let created = Utc::now() - chrono::Duration::minutes(5);
        let mut poem = NewPoem::new(Some("Dawn".into()), Some("a".into()), "wren").into_poem(Uuid::new_v4(), created);
        let now = Utc::now();
        PoemUpdate {
            title: None,
            content: Some("b".into()),
        }
        .apply(&mut poem, now);
        assert_eq!(poem.title, "Dawn");
        assert_eq!(poem.content, "b");
        assert_eq!(poem.created_at, created);
        assert_eq!(poem.updated_at, now);
    }
}
