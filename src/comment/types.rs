//! Comment model.

use std::fmt;
use std::str::FromStr;

use crate::datetime::format_display;

/// Maximum length for comment content (in characters).
pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentStatus {
    #[default]
    Active,
    Deleted,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Active => "ACTIVE",
            CommentStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(CommentStatus::Active),
            "DELETED" => Ok(CommentStatus::Deleted),
            _ => Err(format!("unknown comment status: {s}")),
        }
    }
}

/// A comment joined with its author.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub board_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Comment {
    pub fn is_active(&self) -> bool {
        self.status == CommentStatus::Active
    }

    pub fn is_author(&self, member_id: i64) -> bool {
        self.author_id == member_id
    }
}

/// Comment as shown to members, timestamps rendered `YYYY-MM-DD HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub created_at: String,
    pub updated_at: String,
    pub board_id: i64,
}

impl CommentView {
    /// Render a comment with timestamps shifted into `timezone`.
    pub fn from_comment(comment: &Comment, timezone: &str) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            author_name: comment.author_name.clone(),
            author_email: comment.author_email.clone(),
            created_at: format_display(&comment.created_at, timezone),
            updated_at: format_display(&comment.updated_at, timezone),
            board_id: comment.board_id,
        }
    }
}
