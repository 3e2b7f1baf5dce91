//! Shared helpers for the web API integration tests.

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use library_board::config::Config;
use library_board::web::handlers::AppState;
use library_board::web::middleware::{JwtState, RateLimitState};
use library_board::web::router::create_router;
use library_board::{Database, FileStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSWORD: &str = "reader123!";

/// A router under test with its database and upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub config: Config,
    _upload_dir: TempDir,
}

pub fn test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.server.timezone = "UTC".to_string();
    config.web.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.web.login_rate_limit = 100;
    config.files.upload_dir = upload_dir.path().to_string_lossy().into_owned();
    config.files.max_file_size = 1024;
    config
}

pub async fn create_test_app() -> TestApp {
    let upload_dir = TempDir::new().expect("temp dir");
    create_test_app_with(test_config(&upload_dir), upload_dir).await
}

pub async fn create_test_app_with(config: Config, upload_dir: TempDir) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let storage = FileStorage::new(&config.files).expect("Failed to create storage");

    let app_state = Arc::new(AppState::new(db.clone(), storage, &config));
    let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret));
    let rate_limit = Arc::new(
        RateLimitState::new(config.web.login_rate_limit)
            .with_trusted_proxy_headers(config.web.trust_proxy_headers),
    );

    let router = create_router(app_state, jwt_state, rate_limit, &config.web.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        config,
        _upload_dir: upload_dir,
    }
}

pub fn register_body(email: &str, name: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "confirm_password": PASSWORD,
        "name": name,
        "terms_agreed": true,
        "privacy_agreed": true
    })
}

/// Register a member and return the login response `data`.
pub async fn register_and_login(server: &TestServer, email: &str, name: &str) -> Value {
    server
        .post("/auth/register")
        .json(&register_body(email, name))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["data"].clone()
}

/// Register a member and return an access token.
pub async fn access_token(server: &TestServer, email: &str, name: &str) -> String {
    register_and_login(server, email, name).await["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}
