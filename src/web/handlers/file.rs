//! Attachment download handler.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use std::sync::Arc;

use crate::file::FileService;
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// Content-Disposition value for an attachment download.
///
/// The original name is percent-encoded as UTF-8 in both the plain
/// `filename` parameter and the RFC 5987 `filename*` parameter, so quotes,
/// backslashes and control characters can never reach the header verbatim.
pub fn content_disposition_header(filename: &str) -> String {
    let encoded = urlencoding::encode(filename);
    format!("attachment; filename=\"{encoded}\"; filename*=UTF-8''{encoded}")
}

/// GET /files/download/{file_id} - Download an attachment.
#[utoipa::path(
    get,
    path = "/files/download/{file_id}",
    tag = "files",
    params(("file_id" = i64, Path, description = "Attachment ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Response, ApiError> {
    let result = FileService::new(&state.db, &state.storage)
        .download(file_id)
        .await?;

    let content_type = if result.file.mime_type.is_empty() {
        mime_guess::mime::APPLICATION_OCTET_STREAM.to_string()
    } else {
        result.file.mime_type.clone()
    };

    tracing::debug!(
        file_id,
        member_id = claims.sub,
        size = result.content.len(),
        "File downloaded"
    );

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&result.file.original_filename),
        )
        .header(header::CONTENT_LENGTH, result.content.len())
        .body(Body::from(result.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition_header("report.pdf"),
            "attachment; filename=\"report.pdf\"; filename*=UTF-8''report.pdf"
        );
    }

    #[test]
    fn test_content_disposition_spaces_and_unicode() {
        let value = content_disposition_header("독서 목록.xlsx");
        assert!(value.contains("filename=\"%EB%8F%85%EC%84%9C%20"));
        assert!(value.contains("filename*=UTF-8''%EB%8F%85%EC%84%9C%20"));
    }

    #[test]
    fn test_content_disposition_header_injection() {
        let value = content_disposition_header("evil\"\r\nSet-Cookie: x.txt");
        assert!(!value.contains('\r'));
        assert!(!value.contains('\n'));
        assert!(value.contains("%22"));
        assert!(value.contains("%0D%0A"));
    }
}
