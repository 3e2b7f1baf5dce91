//! Web API attachment download tests.

mod common;

use axum::http::{header, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use common::{access_token, create_test_app};
use serde_json::Value;

async fn post_with_file(app: &common::TestApp, token: &str, name: &str, bytes: &[u8]) -> Value {
    let form = MultipartForm::new()
        .add_text("title", "With attachment")
        .add_text("content", "See file")
        .add_text("category", "NOTICE")
        .add_part(
            "files",
            Part::bytes(bytes.to_vec())
                .file_name(name)
                .mime_type("application/pdf"),
        );
    let response = app
        .server
        .post("/boards")
        .authorization_bearer(token)
        .multipart(form)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

#[tokio::test]
async fn test_download_file() {
    let app = create_test_app().await;
    let token = access_token(&app.server, "dl@example.com", "Downloader").await;
    let board = post_with_file(&app, &token, "대출 안내.pdf", b"%PDF-1.4 body").await;
    let file_id = board["files"][0]["id"].as_i64().unwrap();
    assert_eq!(
        board["files"][0]["download_url"],
        format!("/files/download/{file_id}")
    );

    let response = app
        .server
        .get(&format!("/files/download/{file_id}"))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.4 body");
    assert_eq!(response.header(header::CONTENT_TYPE), "application/pdf");
    assert_eq!(response.header(header::CONTENT_LENGTH), "13");

    let disposition = response.header(header::CONTENT_DISPOSITION);
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\""));
    assert!(disposition.contains("%EB%8C%80%EC%B6%9C%20%EC%95%88%EB%82%B4.pdf"));
    assert!(disposition.contains("filename*=UTF-8''"));
}

#[tokio::test]
async fn test_download_increments_counter() {
    let app = create_test_app().await;
    let token = access_token(&app.server, "count@example.com", "Counter").await;
    let board = post_with_file(&app, &token, "guide.pdf", b"%PDF").await;
    let board_id = board["id"].as_i64().unwrap();
    let file_id = board["files"][0]["id"].as_i64().unwrap();

    for _ in 0..3 {
        app.server
            .get(&format!("/files/download/{file_id}"))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
    }

    let detail = app
        .server
        .get(&format!("/boards/{board_id}"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(detail["data"]["files"][0]["download_count"], 3);
}

#[tokio::test]
async fn test_download_requires_auth_and_existing_file() {
    let app = create_test_app().await;
    let token = access_token(&app.server, "nf@example.com", "Nobody").await;

    app.server
        .get("/files/download/1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/files/download/777")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_missing_bytes_keeps_counter() {
    let app = create_test_app().await;
    let token = access_token(&app.server, "gone@example.com", "Gone").await;
    let board = post_with_file(&app, &token, "vanished.pdf", b"%PDF").await;
    let file_id = board["files"][0]["id"].as_i64().unwrap();

    let (path, stored): (String, String) =
        sqlx::query_as("SELECT file_path, stored_filename FROM board_files WHERE id = ?")
            .bind(file_id)
            .fetch_one(app.db.pool())
            .await
            .unwrap();
    let full = std::path::Path::new(&app.config.files.upload_dir)
        .join(path)
        .join(stored);
    std::fs::remove_file(full).unwrap();

    app.server
        .get(&format!("/files/download/{file_id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT download_count FROM board_files WHERE id = ?")
        .bind(file_id)
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}
