//! Comment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::comment::{CommentService, CommentView};
use crate::web::dto::{sanitize_string, ApiResponse, CommentRequest, CommentResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

fn to_response(comment: &crate::comment::Comment, timezone: &str) -> CommentResponse {
    CommentView::from_comment(comment, timezone).into()
}

/// GET /api/comments/boards/{board_id} - Comments of a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/comments/boards/{board_id}",
    tag = "comments",
    params(("board_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(board_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>, ApiError> {
    let comments: Vec<CommentResponse> = CommentService::new(&state.db)
        .list_by_board(board_id)
        .await?
        .iter()
        .map(|c| to_response(c, &state.timezone))
        .collect();

    Ok(Json(ApiResponse::new(comments)))
}

/// POST /api/comments/boards/{board_id} - Add a comment.
#[utoipa::path(
    post,
    path = "/api/comments/boards/{board_id}",
    tag = "comments",
    params(("board_id" = i64, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Invalid content")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>), ApiError> {
    let comment = CommentService::new(&state.db)
        .create(board_id, claims.sub, &sanitize_string(&req.content))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(to_response(&comment, &state.timezone))),
    ))
}

/// PUT /api/comments/{id} - Edit a comment (author only).
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
        (status = 422, description = "Invalid content or comment deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<CommentResponse>>, ApiError> {
    let comment = CommentService::new(&state.db)
        .update(id, claims.sub, &sanitize_string(&req.content))
        .await?;

    Ok(Json(ApiResponse::new(to_response(&comment, &state.timezone))))
}

/// DELETE /api/comments/{id} - Soft-delete a comment (author only).
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    CommentService::new(&state.db).delete(id, claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
