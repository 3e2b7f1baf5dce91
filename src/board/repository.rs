//! Board repository.
//!
//! Reads join the author row so a post never needs a second query for its
//! author. Inserts and field updates take a connection so the service can
//! run them inside a transaction together with attachment rows.

use sqlx::{QueryBuilder, SqliteConnection, SqlitePool};

use super::types::{Board, BoardCategory, BoardStatus, BoardSummary, BoardUpdate, NewBoard};
use crate::Result;

const BOARD_SELECT: &str = "SELECT b.id, b.title, b.content, b.category, b.status, b.view_count,
                                   b.like_count, b.author_id, m.name AS author_name,
                                   m.email AS author_email, b.created_at, b.updated_at
                            FROM boards b
                            JOIN members m ON m.id = b.author_id";

#[derive(sqlx::FromRow)]
struct BoardRow {
    id: i64,
    title: String,
    content: String,
    category: String,
    status: String,
    view_count: i64,
    like_count: i64,
    author_id: i64,
    author_name: String,
    author_email: String,
    created_at: String,
    updated_at: String,
}

impl BoardRow {
    fn into_board(self) -> Board {
        Board {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category.parse().unwrap_or_default(),
            status: self.status.parse().unwrap_or(BoardStatus::Deleted),
            view_count: self.view_count,
            like_count: self.like_count,
            author_id: self.author_id,
            author_name: self.author_name,
            author_email: self.author_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    category: String,
    author_name: String,
    view_count: i64,
    like_count: i64,
    comment_count: i64,
    created_at: String,
}

impl SummaryRow {
    fn into_summary(self) -> BoardSummary {
        BoardSummary {
            id: self.id,
            title: self.title,
            category: self.category.parse::<BoardCategory>().unwrap_or_default(),
            author_name: self.author_name,
            view_count: self.view_count,
            like_count: self.like_count,
            comment_count: self.comment_count,
            created_at: self.created_at,
        }
    }
}

/// Repository for board posts.
pub struct BoardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BoardRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post and return its ID.
    pub async fn insert(conn: &mut SqliteConnection, new_board: &NewBoard) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO boards (title, content, category, author_id)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_board.title)
        .bind(&new_board.content)
        .bind(new_board.category.as_str())
        .bind(new_board.author_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Apply the set fields and bump `updated_at`.
    ///
    /// Returns false if the post does not exist.
    pub async fn update_fields(
        conn: &mut SqliteConnection,
        id: i64,
        update: &BoardUpdate,
    ) -> Result<bool> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE boards SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.clone());
        }
        if let Some(ref content) = update.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content.clone());
        }
        if let Some(category) = update.category {
            separated.push("category = ");
            separated.push_bind_unseparated(category.as_str());
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&mut *conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a post by ID regardless of status.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let sql = format!("{BOARD_SELECT} WHERE b.id = ?");
        let row: Option<BoardRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(BoardRow::into_board))
    }

    /// Get an ACTIVE post by ID.
    pub async fn get_active(&self, id: i64) -> Result<Option<Board>> {
        let sql = format!("{BOARD_SELECT} WHERE b.id = ? AND b.status = 'ACTIVE'");
        let row: Option<BoardRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(BoardRow::into_board))
    }

    /// One page of ACTIVE posts, newest first.
    pub async fn list_active(&self, limit: i64, offset: i64) -> Result<Vec<BoardSummary>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            "SELECT b.id, b.title, b.category, m.name AS author_name, b.view_count,
                    b.like_count,
                    (SELECT COUNT(*) FROM comments c
                      WHERE c.board_id = b.id AND c.status = 'ACTIVE') AS comment_count,
                    b.created_at
             FROM boards b
             JOIN members m ON m.id = b.author_id
             WHERE b.status = 'ACTIVE'
             ORDER BY b.created_at DESC, b.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(SummaryRow::into_summary).collect())
    }

    pub async fn count_active(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards WHERE status = 'ACTIVE'")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Increment the view counter of an ACTIVE post.
    pub async fn increment_view(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE boards SET view_count = view_count + 1 WHERE id = ? AND status = 'ACTIVE'",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an ACTIVE post DELETED. The row is kept.
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE boards SET status = 'DELETED', updated_at = datetime('now')
             WHERE id = ? AND status = 'ACTIVE'",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
