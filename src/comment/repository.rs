//! Comment repository.

use sqlx::SqlitePool;

use super::types::{Comment, CommentStatus};
use crate::{LibraryError, Result};

const COMMENT_SELECT: &str = "SELECT c.id, c.board_id, c.author_id, m.name AS author_name,
                                     m.email AS author_email, c.content, c.status,
                                     c.created_at, c.updated_at
                              FROM comments c
                              JOIN members m ON m.id = c.author_id";

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    board_id: i64,
    author_id: i64,
    author_name: String,
    author_email: String,
    content: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            board_id: self.board_id,
            author_id: self.author_id,
            author_name: self.author_name,
            author_email: self.author_email,
            content: self.content,
            status: self.status.parse().unwrap_or(CommentStatus::Deleted),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for comment CRUD operations.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment and return it.
    pub async fn create(&self, board_id: i64, author_id: i64, content: &str) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (board_id, author_id, content) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(board_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("comment".to_string()))
    }

    /// Get a comment by ID regardless of status.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
        let row: Option<CommentRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(CommentRow::into_comment))
    }

    /// ACTIVE comments of a post, oldest first.
    pub async fn list_active_by_board(&self, board_id: i64) -> Result<Vec<Comment>> {
        let sql = format!(
            "{COMMENT_SELECT} WHERE c.board_id = ? AND c.status = 'ACTIVE'
             ORDER BY c.created_at ASC, c.id ASC"
        );
        let rows: Vec<CommentRow> = sqlx::query_as(&sql)
            .bind(board_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    pub async fn update_content(&self, id: i64, content: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(content)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE comments SET status = 'DELETED', updated_at = datetime('now')
             WHERE id = ? AND status = 'ACTIVE'",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active_by_board(&self, board_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE board_id = ? AND status = 'ACTIVE'",
        )
        .bind(board_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemberRepository, NewMember};
    use crate::Database;

    async fn setup() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        MemberRepository::new(db.pool())
            .create(&NewMember::new("reader@example.com", "hash", "Reader"))
            .await
            .unwrap();
        sqlx::query("INSERT INTO boards (title, content, author_id) VALUES ('t', 'c', 1)")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_and_list_in_order() {
        let db = setup().await;
        let repo = CommentRepository::new(db.pool());

        let first = repo.create(1, 1, "first").await.unwrap();
        repo.create(1, 1, "second").await.unwrap();

        assert_eq!(first.author_name, "Reader");
        assert_eq!(first.status, CommentStatus::Active);

        let comments = repo.list_active_by_board(1).await.unwrap();
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_soft_delete_and_count() {
        let db = setup().await;
        let repo = CommentRepository::new(db.pool());

        let a = repo.create(1, 1, "a").await.unwrap();
        repo.create(1, 1, "b").await.unwrap();
        assert_eq!(repo.count_active_by_board(1).await.unwrap(), 2);

        assert!(repo.soft_delete(a.id).await.unwrap());
        assert!(!repo.soft_delete(a.id).await.unwrap());
        assert_eq!(repo.count_active_by_board(1).await.unwrap(), 1);
        assert_eq!(repo.list_active_by_board(1).await.unwrap().len(), 1);

        let kept = repo.get_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(kept.status, CommentStatus::Deleted);
    }

    #[tokio::test]
    async fn test_update_content() {
        let db = setup().await;
        let repo = CommentRepository::new(db.pool());

        let c = repo.create(1, 1, "before").await.unwrap();
        assert!(repo.update_content(c.id, "after").await.unwrap());
        assert!(!repo.update_content(999, "after").await.unwrap());
        assert_eq!(
            repo.get_by_id(c.id).await.unwrap().unwrap().content,
            "after"
        );
    }
}
