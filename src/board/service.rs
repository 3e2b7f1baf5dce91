//! Board service.
//!
//! High-level post operations with ownership checks, attachment handling and
//! pagination.

use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::comment::CommentRepository;
use crate::db::{Database, MemberRepository};
use crate::file::{
    file_extension, BoardFile, BoardFileRepository, FileStorage, NewBoardFile, StoredFile, Upload,
    BOARD_SUBDIR,
};
use crate::{LibraryError, Result};

use super::pagination::{Page, PageRequest, PageWindow};
use super::repository::BoardRepository;
use super::types::{Board, BoardCategory, BoardSummary, BoardUpdate, NewBoard, MAX_TITLE_LENGTH};

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LibraryError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(LibraryError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(LibraryError::Validation("content is required".to_string()));
    }
    Ok(())
}

/// A post with its attachments and comment count.
#[derive(Debug, Clone)]
pub struct BoardDetail {
    pub board: Board,
    pub files: Vec<BoardFile>,
    pub comment_count: i64,
}

/// Service for board operations.
pub struct BoardService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
}

impl<'a> BoardService<'a> {
    pub fn new(db: &'a Database, storage: &'a FileStorage) -> Self {
        Self { db, storage }
    }

    /// One page of ACTIVE posts, newest first.
    ///
    /// A page past the end is empty, not an error.
    pub async fn list_boards(&self, request: PageRequest) -> Result<Page<BoardSummary>> {
        let repo = BoardRepository::new(self.db.pool());
        let total = repo.count_active().await?;
        let items = repo.list_active(request.limit(), request.offset()).await?;

        Ok(Page {
            items,
            window: PageWindow::new(request, total),
        })
    }

    /// Show a post and count the view.
    pub async fn get_board(&self, board_id: i64) -> Result<BoardDetail> {
        let repo = BoardRepository::new(self.db.pool());
        let mut board = repo
            .get_active(board_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("board".to_string()))?;

        if repo.increment_view(board_id).await? {
            board.view_count += 1;
        }

        self.detail(board).await
    }

    /// Load a post for editing. Only its author may do so; no view is counted.
    pub async fn get_board_for_edit(&self, board_id: i64, member_id: i64) -> Result<BoardDetail> {
        let board = self.owned_active(board_id, member_id).await?;
        self.detail(board).await
    }

    /// Create a post with its attachments.
    ///
    /// The post and attachment rows are written in one transaction; files
    /// already written to storage are removed again if it fails.
    pub async fn create_board(
        &self,
        new_board: NewBoard,
        uploads: &[Upload],
    ) -> Result<BoardDetail> {
        MemberRepository::new(self.db.pool())
            .get_by_id(new_board.author_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("member".to_string()))?;

        validate_title(&new_board.title)?;
        validate_content(&new_board.content)?;
        self.validate_uploads(uploads)?;

        let new_board = NewBoard {
            title: new_board.title.trim().to_string(),
            ..new_board
        };

        let mut stored = Vec::new();
        let result = async {
            let mut tx = self.db.begin().await?;
            let board_id = BoardRepository::insert(&mut tx, &new_board).await?;
            self.attach_uploads(&mut tx, board_id, uploads, &mut stored)
                .await?;
            tx.commit().await?;
            Ok::<_, LibraryError>(board_id)
        }
        .await;

        let board_id = match result {
            Ok(id) => id,
            Err(e) => {
                self.discard(&stored);
                return Err(e);
            }
        };

        info!(
            board_id,
            author_id = new_board.author_id,
            category = %new_board.category,
            files = stored.len(),
            "Board created"
        );

        self.load_detail(board_id).await
    }

    /// Edit a post: fields, removed attachments and new uploads.
    ///
    /// IDs in `delete_file_ids` that belong to another post are ignored.
    pub async fn update_board(
        &self,
        board_id: i64,
        member_id: i64,
        update: BoardUpdate,
        uploads: &[Upload],
        delete_file_ids: &[i64],
    ) -> Result<BoardDetail> {
        self.owned_active(board_id, member_id).await?;

        if let Some(ref title) = update.title {
            validate_title(title)?;
        }
        if let Some(ref content) = update.content {
            validate_content(content)?;
        }
        self.validate_uploads(uploads)?;

        let update = BoardUpdate {
            title: update.title.map(|t| t.trim().to_string()),
            ..update
        };

        let mut stored = Vec::new();
        let result = async {
            let mut tx = self.db.begin().await?;
            BoardRepository::update_fields(&mut tx, board_id, &update).await?;

            let mut removed = Vec::new();
            for &file_id in delete_file_ids {
                if let Some(file) =
                    BoardFileRepository::delete_for_board(&mut tx, board_id, file_id).await?
                {
                    removed.push(file);
                }
            }

            self.attach_uploads(&mut tx, board_id, uploads, &mut stored)
                .await?;
            tx.commit().await?;
            Ok::<_, LibraryError>(removed)
        }
        .await;

        let removed = match result {
            Ok(removed) => removed,
            Err(e) => {
                self.discard(&stored);
                return Err(e);
            }
        };

        for file in &removed {
            self.storage.delete(&file.file_path, &file.stored_filename);
        }

        info!(
            board_id,
            member_id,
            added = stored.len(),
            removed = removed.len(),
            "Board updated"
        );

        self.load_detail(board_id).await
    }

    /// Soft-delete a post. Only its author may do so.
    pub async fn delete_board(&self, board_id: i64, member_id: i64) -> Result<()> {
        self.owned_active(board_id, member_id).await?;

        if !BoardRepository::new(self.db.pool())
            .soft_delete(board_id)
            .await?
        {
            return Err(LibraryError::NotFound("board".to_string()));
        }

        info!(board_id, member_id, "Board deleted");
        Ok(())
    }

    pub fn list_categories(&self) -> Vec<BoardCategory> {
        BoardCategory::ALL.to_vec()
    }

    async fn owned_active(&self, board_id: i64, member_id: i64) -> Result<Board> {
        let board = BoardRepository::new(self.db.pool())
            .get_active(board_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("board".to_string()))?;

        if !board.is_author(member_id) {
            warn!(board_id, member_id, "Rejected change by non-author");
            return Err(LibraryError::Permission(
                "only the author can modify this post".to_string(),
            ));
        }
        Ok(board)
    }

    async fn load_detail(&self, board_id: i64) -> Result<BoardDetail> {
        let board = BoardRepository::new(self.db.pool())
            .get_active(board_id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("board".to_string()))?;
        self.detail(board).await
    }

    async fn detail(&self, board: Board) -> Result<BoardDetail> {
        let files = {
            let mut conn = self.db.pool().acquire().await?;
            BoardFileRepository::list_by_board(&mut conn, board.id).await?
        };
        let comment_count = CommentRepository::new(self.db.pool())
            .count_active_by_board(board.id)
            .await?;

        Ok(BoardDetail {
            board,
            files,
            comment_count,
        })
    }

    fn validate_uploads(&self, uploads: &[Upload]) -> Result<()> {
        uploads
            .iter()
            .filter(|u| !u.is_empty())
            .try_for_each(|u| self.storage.validate(&u.filename, u.size()))
    }

    async fn attach_uploads(
        &self,
        conn: &mut SqliteConnection,
        board_id: i64,
        uploads: &[Upload],
        stored: &mut Vec<StoredFile>,
    ) -> Result<()> {
        for upload in uploads.iter().filter(|u| !u.is_empty()) {
            let file = self.storage.store(upload, BOARD_SUBDIR)?;
            stored.push(file.clone());

            BoardFileRepository::create(
                conn,
                &NewBoardFile {
                    board_id,
                    original_filename: upload.filename.clone(),
                    stored_filename: file.stored_name,
                    file_path: file.relative_path,
                    file_size: upload.size() as i64,
                    file_extension: file_extension(&upload.filename),
                    mime_type: upload.mime_type(),
                },
            )
            .await?;
        }
        Ok(())
    }

    fn discard(&self, stored: &[StoredFile]) {
        for file in stored {
            self.storage.delete(&file.relative_path, &file.stored_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardStatus;
    use crate::config::FilesConfig;
    use crate::db::NewMember;
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        storage: FileStorage,
        _temp: TempDir,
    }

    impl Fixture {
        fn service(&self) -> BoardService<'_> {
            BoardService::new(&self.db, &self.storage)
        }
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let members = MemberRepository::new(db.pool());
        members
            .create(&NewMember::new("author@example.com", "hash", "Author"))
            .await
            .unwrap();
        members
            .create(&NewMember::new("other@example.com", "hash", "Other"))
            .await
            .unwrap();

        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(&FilesConfig {
            upload_dir: temp.path().to_string_lossy().into_owned(),
            max_file_size: 64,
            ..FilesConfig::default()
        })
        .unwrap();

        Fixture {
            db,
            storage,
            _temp: temp,
        }
    }

    #[tokio::test]
    async fn test_create_board_with_files() {
        let fx = setup().await;
        let service = fx.service();

        let uploads = vec![
            Upload::new("cover.png", vec![1, 2, 3]),
            Upload::new("empty.txt", Vec::new()),
            Upload::new("notes.txt", b"chapter".to_vec()),
        ];
        let detail = service
            .create_board(
                NewBoard::new(1, "  Reading list  ", "Books for May")
                    .with_category(BoardCategory::Review),
                &uploads,
            )
            .await
            .unwrap();

        assert_eq!(detail.board.title, "Reading list");
        assert_eq!(detail.board.category, BoardCategory::Review);
        assert_eq!(detail.board.view_count, 0);
        assert_eq!(detail.files.len(), 2);
        assert_eq!(detail.files[0].original_filename, "cover.png");
        assert_eq!(detail.files[0].mime_type, "image/png");
        assert!(detail.files[0].file_path.starts_with("boards/"));
        assert!(fx
            .storage
            .exists(&detail.files[1].file_path, &detail.files[1].stored_filename));
    }

    #[tokio::test]
    async fn test_create_board_rejects_bad_input() {
        let fx = setup().await;
        let service = fx.service();

        let no_author = service
            .create_board(NewBoard::new(999, "Title", "Body"), &[])
            .await;
        assert!(matches!(no_author, Err(LibraryError::NotFound(_))));

        let blank = service
            .create_board(NewBoard::new(1, "   ", "Body"), &[])
            .await;
        assert!(matches!(blank, Err(LibraryError::Validation(_))));

        let long = service
            .create_board(NewBoard::new(1, "t".repeat(201), "Body"), &[])
            .await;
        assert!(matches!(long, Err(LibraryError::Validation(_))));

        let bad_file = service
            .create_board(
                NewBoard::new(1, "Title", "Body"),
                &[
                    Upload::new("ok.txt", b"fine".to_vec()),
                    Upload::new("virus.exe", b"MZ".to_vec()),
                ],
            )
            .await;
        assert!(matches!(bad_file, Err(LibraryError::InvalidFile(_))));

        let page = service.list_boards(PageRequest::default()).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_get_board_counts_views() {
        let fx = setup().await;
        let service = fx.service();
        let id = service
            .create_board(NewBoard::new(1, "Hello", "World"), &[])
            .await
            .unwrap()
            .board
            .id;

        assert_eq!(service.get_board(id).await.unwrap().board.view_count, 1);
        assert_eq!(service.get_board(id).await.unwrap().board.view_count, 2);

        let edit = service.get_board_for_edit(id, 1).await.unwrap();
        assert_eq!(edit.board.view_count, 2);

        let denied = service.get_board_for_edit(id, 2).await;
        assert!(matches!(denied, Err(LibraryError::Permission(_))));
    }

    #[tokio::test]
    async fn test_list_boards_pagination() {
        let fx = setup().await;
        let service = fx.service();
        for i in 0..10 {
            service
                .create_board(NewBoard::new(1, format!("Post {i}"), "Body"), &[])
                .await
                .unwrap();
        }

        let first = service
            .list_boards(PageRequest::new(Some(1), Some(8)))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.items[0].title, "Post 9");
        assert_eq!(first.window.total_pages, 2);
        assert_eq!(first.window.total_elements, 10);

        let second = service
            .list_boards(PageRequest::new(Some(2), Some(8)))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);

        let beyond = service
            .list_boards(PageRequest::new(Some(5), Some(8)))
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_board_files_and_fields() {
        let fx = setup().await;
        let service = fx.service();
        let created = service
            .create_board(
                NewBoard::new(1, "Draft", "Body"),
                &[
                    Upload::new("a.txt", b"a".to_vec()),
                    Upload::new("b.txt", b"b".to_vec()),
                ],
            )
            .await
            .unwrap();
        let id = created.board.id;
        let removed = created.files[0].clone();

        let updated = service
            .update_board(
                id,
                1,
                BoardUpdate::new().title("Final").category(BoardCategory::Notice),
                &[Upload::new("c.pdf", b"%PDF".to_vec())],
                &[removed.id, 9999],
            )
            .await
            .unwrap();

        assert_eq!(updated.board.title, "Final");
        assert_eq!(updated.board.content, "Body");
        assert_eq!(updated.board.category, BoardCategory::Notice);
        let names: Vec<_> = updated
            .files
            .iter()
            .map(|f| f.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["b.txt", "c.pdf"]);
        assert!(!fx
            .storage
            .exists(&removed.file_path, &removed.stored_filename));
    }

    #[tokio::test]
    async fn test_update_board_requires_author() {
        let fx = setup().await;
        let service = fx.service();
        let id = service
            .create_board(NewBoard::new(1, "Mine", "Body"), &[])
            .await
            .unwrap()
            .board
            .id;

        let denied = service
            .update_board(id, 2, BoardUpdate::new().title("Theirs"), &[], &[])
            .await;
        assert!(matches!(denied, Err(LibraryError::Permission(_))));

        let blank = service
            .update_board(id, 1, BoardUpdate::new().content("  "), &[], &[])
            .await;
        assert!(matches!(blank, Err(LibraryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_board_soft() {
        let fx = setup().await;
        let service = fx.service();
        let id = service
            .create_board(NewBoard::new(1, "Temporary", "Body"), &[])
            .await
            .unwrap()
            .board
            .id;

        let denied = service.delete_board(id, 2).await;
        assert!(matches!(denied, Err(LibraryError::Permission(_))));

        service.delete_board(id, 1).await.unwrap();

        assert!(matches!(
            service.get_board(id).await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(service
            .list_boards(PageRequest::default())
            .await
            .unwrap()
            .items
            .is_empty());
        assert!(matches!(
            service.delete_board(id, 1).await,
            Err(LibraryError::NotFound(_))
        ));

        let kept = BoardRepository::new(fx.db.pool())
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.status, BoardStatus::Deleted);
    }

    #[tokio::test]
    async fn test_comment_count_in_detail_and_listing() {
        let fx = setup().await;
        let service = fx.service();
        let id = service
            .create_board(NewBoard::new(1, "Discuss", "Body"), &[])
            .await
            .unwrap()
            .board
            .id;

        let comments = CommentRepository::new(fx.db.pool());
        comments.create(id, 2, "one").await.unwrap();
        let gone = comments.create(id, 2, "two").await.unwrap();
        comments.soft_delete(gone.id).await.unwrap();

        assert_eq!(service.get_board(id).await.unwrap().comment_count, 1);
        let page = service.list_boards(PageRequest::default()).await.unwrap();
        assert_eq!(page.items[0].comment_count, 1);
    }

    #[tokio::test]
    async fn test_list_categories() {
        let fx = setup().await;
        let categories = fx.service().list_categories();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[0], BoardCategory::Notice);
    }
}
