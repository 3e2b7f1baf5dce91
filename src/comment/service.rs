//! Comment service.

use tracing::info;

use crate::board::BoardRepository;
use crate::db::{Database, MemberRepository};
use crate::{LibraryError, Result};

use super::repository::CommentRepository;
use super::types::{Comment, MAX_COMMENT_LENGTH};

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(LibraryError::Validation(
            "comment content is required".to_string(),
        ));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(LibraryError::Validation(format!(
            "comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Service for comment operations with ownership checks.
pub struct CommentService<'a> {
    db: &'a Database,
}

impl<'a> CommentService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// ACTIVE comments of a post, oldest first.
    pub async fn list_by_board(&self, board_id: i64) -> Result<Vec<Comment>> {
        CommentRepository::new(self.db.pool())
            .list_active_by_board(board_id)
            .await
    }

    /// Add a comment to an ACTIVE post.
    pub async fn create(&self, board_id: i64, member_id: i64, content: &str) -> Result<Comment> {
        BoardRepository::new(self.db.pool())
            .get_active(board_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("board".to_string()))?;

        MemberRepository::new(self.db.pool())
            .get_by_id(member_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("member".to_string()))?;

        validate_content(content)?;

        let comment = CommentRepository::new(self.db.pool())
            .create(board_id, member_id, content.trim())
            .await?;

        info!(comment_id = comment.id, board_id, member_id, "Comment created");
        Ok(comment)
    }

    /// Edit a comment. Only its author may do so.
    pub async fn update(&self, comment_id: i64, member_id: i64, content: &str) -> Result<Comment> {
        let repo = CommentRepository::new(self.db.pool());
        let comment = self.owned_active(&repo, comment_id, member_id).await?;

        validate_content(content)?;
        repo.update_content(comment.id, content.trim()).await?;

        repo.get_by_id(comment.id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("comment".to_string()))
    }

    /// Soft-delete a comment. Only its author may do so.
    pub async fn delete(&self, comment_id: i64, member_id: i64) -> Result<()> {
        let repo = CommentRepository::new(self.db.pool());
        let comment = self.owned_active(&repo, comment_id, member_id).await?;

        repo.soft_delete(comment.id).await?;
        info!(comment_id, member_id, "Comment deleted");
        Ok(())
    }

    /// Number of ACTIVE comments on a post.
    pub async fn count_by_board(&self, board_id: i64) -> Result<i64> {
        CommentRepository::new(self.db.pool())
            .count_active_by_board(board_id)
            .await
    }

    async fn owned_active(
        &self,
        repo: &CommentRepository<'_>,
        comment_id: i64,
        member_id: i64,
    ) -> Result<Comment> {
        let comment = repo
            .get_by_id(comment_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("comment".to_string()))?;

        if !comment.is_author(member_id) {
            return Err(LibraryError::Permission(
                "only the author can modify this comment".to_string(),
            ));
        }
        if !comment.is_active() {
            return Err(LibraryError::Validation(
                "comment has already been deleted".to_string(),
            ));
        }
        Ok(comment)
    }
}
