//! Web API authentication tests.

mod common;

use axum::http::{HeaderName, StatusCode};
use common::{access_token, create_test_app, register_and_login, register_body, PASSWORD};
use library_board::db::{MemberRepository, MemberStatus};
use serde_json::{json, Value};

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "name": "Kim Reader",
            "phone": "010-1234-5678",
            "terms_agreed": true,
            "privacy_agreed": true
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "reader@example.com");
    assert_eq!(body["data"]["member_type"], "REGULAR");
    assert_eq!(body["data"]["status"], "ACTIVE");
    assert_eq!(body["data"]["role"], "USER");
    assert_eq!(body["data"]["phone"], "010-1234-5678");
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app().await;
    let body = register_body("dup@example.com", "First");

    app.server
        .post("/auth/register")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.server.post("/auth/register").json(&body).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = create_test_app().await;

    let mut mismatch = register_body("a@example.com", "Name");
    mismatch["confirm_password"] = json!("other1234");
    app.server
        .post("/auth/register")
        .json(&mismatch)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let mut no_terms = register_body("b@example.com", "Name");
    no_terms["terms_agreed"] = json!(false);
    app.server
        .post("/auth/register")
        .json(&no_terms)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let mut weak = register_body("c@example.com", "Name");
    weak["password"] = json!("onlyletters");
    weak["confirm_password"] = json!("onlyletters");
    app.server
        .post("/auth/register")
        .json(&weak)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let mut bad_phone = register_body("d@example.com", "Name");
    bad_phone["phone"] = json!("01012345678");
    app.server
        .post("/auth/register")
        .json(&bad_phone)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    app.server
        .post("/auth/register")
        .json(&register_body("not-an-email", "Name"))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/auth/register")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_email() {
    let app = create_test_app().await;
    register_and_login(&app.server, "taken@example.com", "Taken").await;

    let response = app
        .server
        .get("/auth/check-email")
        .add_query_param("email", "taken@example.com")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["exists"], true);

    let response = app
        .server
        .get("/auth/check-email")
        .add_query_param("email", "free@example.com")
        .await;
    assert_eq!(response.json::<Value>()["data"]["exists"], false);
}

// ============================================================================
// Login / tokens
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app().await;
    let data = register_and_login(&app.server, "login@example.com", "Login").await;

    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["expires_in"], 1800);
    assert_eq!(data["member"]["email"], "login@example.com");
}

#[tokio::test]
async fn test_login_failures_share_message() {
    let app = create_test_app().await;
    register_and_login(&app.server, "user@example.com", "User").await;

    let wrong_password = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "user@example.com", "password": "wrong1234" }))
        .await;
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let unknown = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(
        wrong_password.json::<Value>()["error"]["message"],
        unknown.json::<Value>()["error"]["message"]
    );
}

#[tokio::test]
async fn test_login_suspended_member_forbidden() {
    let app = create_test_app().await;
    let data = register_and_login(&app.server, "late@example.com", "Late").await;
    let member_id = data["member"]["id"].as_i64().unwrap();

    let repo = MemberRepository::new(app.db.pool());
    library_board::change_status(&repo, member_id, MemberStatus::Suspended)
        .await
        .unwrap();

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "late@example.com", "password": PASSWORD }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    // Suspension also revoked the refresh token issued before it.
    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": data["refresh_token"] }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rate_limited() {
    let upload_dir = tempfile::TempDir::new().unwrap();
    let mut config = common::test_config(&upload_dir);
    config.web.login_rate_limit = 2;
    let app = common::create_test_app_with(config, upload_dir).await;

    for _ in 0..2 {
        app.server
            .post("/auth/login")
            .json(&json!({ "email": "x@example.com", "password": "whatever1" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "x@example.com", "password": "whatever1" }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["error"]["code"], "TOO_MANY_REQUESTS");
}

async fn login_from(app: &common::TestApp, forwarded_for: &str) -> StatusCode {
    app.server
        .post("/auth/login")
        .add_header(X_FORWARDED_FOR, forwarded_for.to_string())
        .json(&json!({ "email": "x@example.com", "password": "whatever1" }))
        .await
        .status_code()
}

#[tokio::test]
async fn test_login_rate_limit_ignores_forwarded_for() {
    let upload_dir = tempfile::TempDir::new().unwrap();
    let mut config = common::test_config(&upload_dir);
    config.web.login_rate_limit = 2;
    let app = common::create_test_app_with(config, upload_dir).await;

    assert_eq!(login_from(&app, "203.0.113.1").await, StatusCode::UNAUTHORIZED);
    assert_eq!(login_from(&app, "203.0.113.2").await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        login_from(&app, "203.0.113.3").await,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_login_rate_limit_trusted_proxy_headers() {
    let upload_dir = tempfile::TempDir::new().unwrap();
    let mut config = common::test_config(&upload_dir);
    config.web.login_rate_limit = 1;
    config.web.trust_proxy_headers = true;
    let app = common::create_test_app_with(config, upload_dir).await;

    assert_eq!(login_from(&app, "203.0.113.1").await, StatusCode::UNAUTHORIZED);
    assert_eq!(login_from(&app, "203.0.113.2").await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        login_from(&app, "203.0.113.1").await,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_me() {
    let app = create_test_app().await;
    let token = access_token(&app.server, "me@example.com", "Me").await;

    let response = app.server.get("/auth/me").authorization_bearer(&token).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["name"], "Me");

    app.server
        .get("/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/auth/me")
        .authorization_bearer("garbage")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = create_test_app().await;
    let data = register_and_login(&app.server, "rot@example.com", "Rot").await;
    let old_refresh = data["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await;
    response.assert_status_ok();
    let new_refresh = response.json::<Value>()["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(new_refresh, old_refresh);

    // The old token was revoked by the rotation.
    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": new_refresh }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = create_test_app().await;
    let data = register_and_login(&app.server, "bye@example.com", "Bye").await;
    let refresh = data["refresh_token"].as_str().unwrap().to_string();

    app.server
        .post("/auth/logout")
        .json(&json!({ "refresh_token": refresh }))
        .await
        .assert_status_ok();

    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": refresh }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // Logging out twice is harmless.
    app.server
        .post("/auth/logout")
        .json(&json!({ "refresh_token": refresh }))
        .await
        .assert_status_ok();
}

// ============================================================================
// Home
// ============================================================================

#[tokio::test]
async fn test_home_and_health() {
    let app = create_test_app().await;

    let response = app.server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["site_name"], "Library");
    assert_eq!(body["data"]["member_count"], 0);
    assert!(body["data"].get("member_name").is_none());

    let token = access_token(&app.server, "home@example.com", "Homer").await;
    let response = app.server.get("/home").authorization_bearer(&token).await;
    let body: Value = response.json();
    assert_eq!(body["data"]["member_count"], 1);
    assert_eq!(body["data"]["member_name"], "Homer");

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_served() {
    let app = create_test_app().await;

    let response = app.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();
    let doc: Value = response.json();
    assert!(doc["paths"]["/auth/login"].is_object());
}
