//! Board handlers.

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::{BoardCategory, BoardService, BoardUpdate, NewBoard, PageRequest};
use crate::file::Upload;
use crate::web::dto::{
    sanitize_string, ApiResponse, BoardDetailResponse, BoardPageResponse, CategoryResponse,
    PageQuery,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// Fields of a board create/edit form.
#[derive(Debug, Default)]
struct BoardForm {
    title: Option<String>,
    content: Option<String>,
    category: Option<BoardCategory>,
    files: Vec<Upload>,
    delete_file_ids: Vec<i64>,
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("Request body is too large");
    }
    tracing::debug!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

fn parse_category(value: &str) -> Result<BoardCategory, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::unprocessable(format!("Unknown category: {}", value.trim())))
}

/// Parse `delete_file_ids`, given either repeated or comma separated.
fn parse_file_ids(value: &str, ids: &mut Vec<i64>) -> Result<(), ApiError> {
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse()
            .map_err(|_| ApiError::unprocessable(format!("Invalid file id: {part}")))?;
        ids.push(id);
    }
    Ok(())
}

/// Read a board form.
///
/// Empty file parts (a file input left blank) are skipped. A single file
/// over `max_file_size` is rejected with 413 before anything is stored.
async fn read_board_form(
    mut multipart: Multipart,
    max_file_size: u64,
) -> Result<BoardForm, ApiError> {
    let mut form = BoardForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => form.title = Some(sanitize_string(&read_text(field).await?)),
            "content" => form.content = Some(sanitize_string(&read_text(field).await?)),
            "category" => {
                let value = read_text(field).await?;
                if !value.trim().is_empty() {
                    form.category = Some(parse_category(&value)?);
                }
            }
            "delete_file_ids" => {
                parse_file_ids(&read_text(field).await?, &mut form.delete_file_ids)?
            }
            "files" | "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|c| c.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;

                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                if bytes.len() as u64 > max_file_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File too large: {} (max {} bytes)",
                        filename, max_file_size
                    )));
                }

                let mut upload = Upload::new(filename, bytes.to_vec());
                if let Some(content_type) = content_type {
                    upload = upload.with_content_type(content_type);
                }
                form.files.push(upload);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// GET /boards - Paginated list of posts.
#[utoipa::path(
    get,
    path = "/boards",
    tag = "boards",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = BoardPageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<BoardPageResponse>>, ApiError> {
    let request = PageRequest::new(query.page, query.size);
    let page = BoardService::new(&state.db, &state.storage)
        .list_boards(request)
        .await?;

    Ok(Json(ApiResponse::new(BoardPageResponse::new(
        page,
        &state.timezone,
    ))))
}

/// GET /boards/categories - All post categories.
#[utoipa::path(
    get,
    path = "/boards/categories",
    tag = "boards",
    responses((status = 200, description = "Categories", body = Vec<CategoryResponse>)),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
) -> Json<ApiResponse<Vec<CategoryResponse>>> {
    let categories: Vec<CategoryResponse> = BoardService::new(&state.db, &state.storage)
        .list_categories()
        .into_iter()
        .map(CategoryResponse::from)
        .collect();

    Json(ApiResponse::new(categories))
}

/// POST /boards - Create a post.
///
/// Multipart form with `title`, `content`, `category` and any number of
/// `files` parts.
#[utoipa::path(
    post,
    path = "/boards",
    tag = "boards",
    responses(
        (status = 201, description = "Post created", body = BoardDetailResponse),
        (status = 413, description = "Attachment too large"),
        (status = 422, description = "Invalid post or attachment")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<BoardDetailResponse>>), ApiError> {
    let form = read_board_form(multipart, state.storage.max_file_size()).await?;

    let category = form
        .category
        .ok_or_else(|| ApiError::unprocessable("category is required"))?;
    let new_board = NewBoard::new(
        claims.sub,
        form.title.unwrap_or_default(),
        form.content.unwrap_or_default(),
    )
    .with_category(category);

    let detail = BoardService::new(&state.db, &state.storage)
        .create_board(new_board, &form.files)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BoardDetailResponse::new(
            detail,
            &state.timezone,
        ))),
    ))
}

/// GET /boards/{id} - Show a post; counts a view.
#[utoipa::path(
    get,
    path = "/boards/{id}",
    tag = "boards",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post detail", body = BoardDetailResponse),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BoardDetailResponse>>, ApiError> {
    let detail = BoardService::new(&state.db, &state.storage)
        .get_board(id)
        .await?;

    Ok(Json(ApiResponse::new(BoardDetailResponse::new(
        detail,
        &state.timezone,
    ))))
}

/// GET /boards/{id}/edit - Load a post for editing (author only).
#[utoipa::path(
    get,
    path = "/boards/{id}/edit",
    tag = "boards",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post detail", body = BoardDetailResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BoardDetailResponse>>, ApiError> {
    let detail = BoardService::new(&state.db, &state.storage)
        .get_board_for_edit(id, claims.sub)
        .await?;

    Ok(Json(ApiResponse::new(BoardDetailResponse::new(
        detail,
        &state.timezone,
    ))))
}

/// PUT /boards/{id} - Update a post (author only).
///
/// Multipart form; every field is optional. `delete_file_ids` lists
/// attachments to remove and new `files` parts are added.
#[utoipa::path(
    put,
    path = "/boards/{id}",
    tag = "boards",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post updated", body = BoardDetailResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 413, description = "Attachment too large")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<BoardDetailResponse>>, ApiError> {
    let form = read_board_form(multipart, state.storage.max_file_size()).await?;

    let mut update = BoardUpdate::new();
    if let Some(title) = form.title {
        update = update.title(title);
    }
    if let Some(content) = form.content {
        update = update.content(content);
    }
    if let Some(category) = form.category {
        update = update.category(category);
    }

    let detail = BoardService::new(&state.db, &state.storage)
        .update_board(id, claims.sub, update, &form.files, &form.delete_file_ids)
        .await?;

    Ok(Json(ApiResponse::new(BoardDetailResponse::new(
        detail,
        &state.timezone,
    ))))
}

/// DELETE /boards/{id} - Soft-delete a post (author only).
#[utoipa::path(
    delete,
    path = "/boards/{id}",
    tag = "boards",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    BoardService::new(&state.db, &state.storage)
        .delete_board(id, claims.sub)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_ids() {
        let mut ids = Vec::new();
        parse_file_ids("3, 5,,7", &mut ids).unwrap();
        parse_file_ids("9", &mut ids).unwrap();
        assert_eq!(ids, vec![3, 5, 7, 9]);

        assert!(parse_file_ids("abc", &mut ids).is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("qna").unwrap(), BoardCategory::Qna);
        assert!(parse_category("POLL").is_err());
    }
}
