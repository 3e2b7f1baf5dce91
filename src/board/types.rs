//! Board post model.

use std::fmt;
use std::str::FromStr;

/// Maximum length for post titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Post category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardCategory {
    Notice,
    #[default]
    Free,
    Qna,
    Review,
}

impl BoardCategory {
    pub const ALL: [BoardCategory; 4] = [
        BoardCategory::Notice,
        BoardCategory::Free,
        BoardCategory::Qna,
        BoardCategory::Review,
    ];

    /// Convert category to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardCategory::Notice => "NOTICE",
            BoardCategory::Free => "FREE",
            BoardCategory::Qna => "QNA",
            BoardCategory::Review => "REVIEW",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BoardCategory::Notice => "Notice",
            BoardCategory::Free => "Free Board",
            BoardCategory::Qna => "Q&A",
            BoardCategory::Review => "Book Review",
        }
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NOTICE" => Ok(BoardCategory::Notice),
            "FREE" => Ok(BoardCategory::Free),
            "QNA" => Ok(BoardCategory::Qna),
            "REVIEW" => Ok(BoardCategory::Review),
            _ => Err(format!("unknown board category: {s}")),
        }
    }
}

/// Lifecycle of a post. Deletion is soft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardStatus {
    #[default]
    Active,
    Deleted,
}

impl BoardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardStatus::Active => "ACTIVE",
            BoardStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(BoardStatus::Active),
            "DELETED" => Ok(BoardStatus::Deleted),
            _ => Err(format!("unknown board status: {s}")),
        }
    }
}

/// A board post joined with its author.
#[derive(Debug, Clone)]
pub struct Board {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: BoardCategory,
    pub status: BoardStatus,
    pub view_count: i64,
    pub like_count: i64,
    /// Fixed at creation.
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Board {
    pub fn is_active(&self) -> bool {
        self.status == BoardStatus::Active
    }

    pub fn is_author(&self, member_id: i64) -> bool {
        self.author_id == member_id
    }
}

/// One row of the post listing.
#[derive(Debug, Clone)]
pub struct BoardSummary {
    pub id: i64,
    pub title: String,
    pub category: BoardCategory,
    pub author_name: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: String,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub title: String,
    pub content: String,
    pub category: BoardCategory,
    pub author_id: i64,
}

impl NewBoard {
    pub fn new(author_id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: BoardCategory::default(),
            author_id,
        }
    }

    pub fn with_category(mut self, category: BoardCategory) -> Self {
        self.category = category;
        self
    }
}

/// Builder for updating a post.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<BoardCategory>,
}

impl BoardUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn category(mut self, category: BoardCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }
}
