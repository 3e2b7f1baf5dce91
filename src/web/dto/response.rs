//! Response DTOs for the web API.
//!
//! Timestamps are rendered in the configured display timezone as
//! `YYYY-MM-DD HH:MM`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::board::{Board, BoardCategory, BoardDetail, BoardSummary, Page};
use crate::comment::CommentView;
use crate::datetime::format_display;
use crate::db::Member;
use crate::file::BoardFile;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Member profile. Never includes the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub join_date: String,
    /// REGULAR, SILVER, GOLD or VIP.
    pub member_type: String,
    pub status: String,
    pub role: String,
    /// Books that may be on loan at once.
    pub max_rental_books: u32,
    pub rental_days: u32,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            email: member.email.clone(),
            name: member.name.clone(),
            phone: member.phone.clone(),
            address: member.address.clone(),
            join_date: member.join_date.clone(),
            member_type: member.member_type.as_str().to_string(),
            status: member.status.as_str().to_string(),
            role: member.role.as_str().to_string(),
            max_rental_books: member.member_type.max_rental_books(),
            rental_days: member.member_type.rental_days(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub member: MemberResponse,
}

/// Token refresh response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Replaces the refresh token that was presented.
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Duplicate email check result.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailExistsResponse {
    pub email: String,
    pub exists: bool,
}

/// Home page summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub site_name: String,
    pub member_count: i64,
    pub board_count: i64,
    /// Name of the signed-in member, if a valid token was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
}

// ============================================================================
// Board
// ============================================================================

/// Board category with its display name.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// NOTICE, FREE, QNA or REVIEW.
    pub code: String,
    pub name: String,
}

impl From<BoardCategory> for CategoryResponse {
    fn from(category: BoardCategory) -> Self {
        Self {
            code: category.as_str().to_string(),
            name: category.display_name().to_string(),
        }
    }
}

/// Row of the board list.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardSummaryResponse {
    pub id: i64,
    pub title: String,
    pub category: CategoryResponse,
    pub author_name: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: String,
}

impl BoardSummaryResponse {
    pub fn new(summary: BoardSummary, timezone: &str) -> Self {
        Self {
            id: summary.id,
            created_at: format_display(&summary.created_at, timezone),
            title: summary.title,
            category: summary.category.into(),
            author_name: summary.author_name,
            view_count: summary.view_count,
            like_count: summary.like_count,
            comment_count: summary.comment_count,
        }
    }
}

/// A page of the board list plus the navigation window.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardPageResponse {
    pub items: Vec<BoardSummaryResponse>,
    /// Current page (1-based).
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    /// First page number of the 10-page navigation window.
    pub start_page: u32,
    /// Last page number of the navigation window.
    pub end_page: u32,
    pub has_prev_group: bool,
    pub prev_group_page: u32,
    pub has_next_group: bool,
    pub next_group_page: u32,
}

impl BoardPageResponse {
    pub fn new(page: Page<BoardSummary>, timezone: &str) -> Self {
        let window = page.window;
        Self {
            items: page
                .items
                .into_iter()
                .map(|summary| BoardSummaryResponse::new(summary, timezone))
                .collect(),
            page: window.page,
            size: window.size,
            total_elements: window.total_elements,
            total_pages: window.total_pages,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
            start_page: window.start_page,
            end_page: window.end_page,
            has_prev_group: window.has_prev_group,
            prev_group_page: window.prev_group_page,
            has_next_group: window.has_next_group,
            next_group_page: window.next_group_page,
        }
    }
}

/// Attachment metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardFileResponse {
    pub id: i64,
    pub original_filename: String,
    pub file_size: i64,
    /// Human readable size, e.g. `1.5 MB`.
    pub formatted_size: String,
    pub file_extension: String,
    /// image, pdf, document, excel, powerpoint, archive, text or default.
    pub file_type: String,
    pub icon_class: String,
    pub mime_type: String,
    pub download_count: i64,
    pub download_url: String,
    pub created_at: String,
}

impl BoardFileResponse {
    pub fn new(file: &BoardFile, timezone: &str) -> Self {
        Self {
            id: file.id,
            original_filename: file.original_filename.clone(),
            file_size: file.file_size,
            formatted_size: file.formatted_size(),
            file_extension: file.file_extension.clone(),
            file_type: file.file_type().as_str().to_string(),
            icon_class: file.icon_class().to_string(),
            mime_type: file.mime_type.clone(),
            download_count: file.download_count,
            download_url: format!("/files/download/{}", file.id),
            created_at: format_display(&file.created_at, timezone),
        }
    }
}

/// Board detail with attachments.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardDetailResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: CategoryResponse,
    pub status: String,
    pub view_count: i64,
    pub like_count: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub comment_count: i64,
    pub files: Vec<BoardFileResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl BoardDetailResponse {
    pub fn new(detail: BoardDetail, timezone: &str) -> Self {
        let BoardDetail {
            board,
            files,
            comment_count,
        } = detail;
        let Board {
            id,
            title,
            content,
            category,
            status,
            view_count,
            like_count,
            author_id,
            author_name,
            author_email,
            created_at,
            updated_at,
        } = board;

        Self {
            id,
            title,
            content,
            category: category.into(),
            status: status.as_str().to_string(),
            view_count,
            like_count,
            author_id,
            author_name,
            author_email,
            comment_count,
            files: files
                .iter()
                .map(|f| BoardFileResponse::new(f, timezone))
                .collect(),
            created_at: format_display(&created_at, timezone),
            updated_at: format_display(&updated_at, timezone),
        }
    }
}

// ============================================================================
// Comment
// ============================================================================

/// Comment as shown under a post.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub board_id: i64,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.id,
            board_id: view.board_id,
            content: view.content,
            author_name: view.author_name,
            author_email: view.author_email,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}
