//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    BoardDetailResponse, BoardFileResponse, BoardPageResponse, BoardSummaryResponse,
    CategoryResponse, CommentRequest, CommentResponse, EmailExistsResponse, HomeResponse,
    LoginRequest, LoginResponse, LogoutRequest, MemberResponse, RefreshRequest, RefreshResponse,
    RegisterRequest,
};
use super::handlers::{self, AppState};
use super::middleware::{create_cors_layer, jwt_auth, login_rate_limit, JwtState, RateLimitState};

/// Attachments accepted in one board form, for sizing the body limit.
pub const MAX_FILES_PER_REQUEST: u64 = 10;

/// Body limit for multipart board forms: room for
/// [`MAX_FILES_PER_REQUEST`] full-size files plus the text fields.
pub fn multipart_body_limit(max_file_size: u64) -> usize {
    let limit = max_file_size
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(1024 * 1024);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home::home,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::auth::check_email,
        handlers::board::list_boards,
        handlers::board::list_categories,
        handlers::board::create_board,
        handlers::board::get_board,
        handlers::board::edit_board,
        handlers::board::update_board,
        handlers::board::delete_board,
        handlers::comment::list_comments,
        handlers::comment::create_comment,
        handlers::comment::update_comment,
        handlers::comment::delete_comment,
        handlers::file::download_file,
    ),
    components(schemas(
        HomeResponse,
        RegisterRequest,
        LoginRequest,
        LogoutRequest,
        RefreshRequest,
        MemberResponse,
        LoginResponse,
        RefreshResponse,
        EmailExistsResponse,
        CategoryResponse,
        BoardSummaryResponse,
        BoardPageResponse,
        BoardFileResponse,
        BoardDetailResponse,
        CommentRequest,
        CommentResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "boards", description = "Posts and attachments"),
        (name = "comments", description = "Comments on posts"),
        (name = "files", description = "Attachment downloads"),
        (name = "home", description = "Site summary")
    )
)]
pub struct ApiDoc;

/// Create the application router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    let login_route = Router::new()
        .route("/login", post(handlers::login))
        .layer(middleware::from_fn(move |req, next| {
            login_rate_limit(rate_limit.clone(), req, next)
        }));

    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/refresh", post(handlers::refresh))
        .route("/me", get(handlers::me))
        .route("/check-email", get(handlers::check_email))
        .merge(login_route);

    let board_routes = Router::new()
        .route("/", get(handlers::list_boards).post(handlers::create_board))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/:id",
            get(handlers::get_board)
                .put(handlers::update_board)
                .delete(handlers::delete_board),
        )
        .route("/:id/edit", get(handlers::edit_board))
        .layer(DefaultBodyLimit::max(multipart_body_limit(
            app_state.storage.max_file_size(),
        )));

    let comment_routes = Router::new()
        .route(
            "/boards/:board_id",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/:id",
            put(handlers::update_comment).delete(handlers::delete_comment),
        );

    Router::new()
        .route("/", get(handlers::home))
        .route("/home", get(handlers::home))
        .route("/health", get(handlers::health))
        .nest("/auth", auth_routes)
        .nest("/boards", board_routes)
        .nest("/api/comments", comment_routes)
        .route("/files/download/:file_id", get(handlers::download_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    jwt_auth(jwt_state.clone(), req, next)
                })),
        )
        .with_state(app_state)
}
