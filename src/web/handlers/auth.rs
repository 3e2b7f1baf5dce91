//! Authentication handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{authenticate, mask_email, register as register_member, RegistrationRequest};
use crate::config::Config;
use crate::db::{Member, MemberRepository, NewRefreshToken, RefreshTokenRepository};
use crate::file::FileStorage;
use crate::web::dto::{
    ApiResponse, EmailExistsResponse, EmailQuery, LoginRequest, LoginResponse, LogoutRequest,
    MemberResponse, RefreshRequest, RefreshResponse, RegisterRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};
use crate::Database;

const TOKEN_TYPE: &str = "Bearer";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Attachment storage.
    pub storage: FileStorage,
    pub site_name: String,
    /// Timezone used when rendering timestamps.
    pub timezone: String,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
}

impl AppState {
    pub fn new(db: Database, storage: FileStorage, config: &Config) -> Self {
        Self {
            db,
            storage,
            site_name: config.server.site_name.clone(),
            timezone: config.server.timezone.clone(),
            encoding_key: EncodingKey::from_secret(config.web.jwt_secret.as_bytes()),
            access_token_expiry: config.web.jwt_access_token_expiry_secs,
            refresh_token_expiry: config.web.jwt_refresh_token_expiry_days,
        }
    }

    /// Sign an access token for a member.
    pub fn generate_access_token(&self, member: &Member) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: member.id,
            email: member.email.clone(),
            role: member.role.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(self.access_token_expiry),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Create and persist a new refresh token for a member.
    pub async fn issue_refresh_token(&self, member_id: i64) -> Result<String, ApiError> {
        let token = uuid::Uuid::new_v4().to_string();
        let lifetime = i64::try_from(self.refresh_token_expiry)
            .ok()
            .and_then(chrono::Duration::try_days)
            .ok_or_else(|| ApiError::internal("Invalid refresh token expiry"))?;
        let expires_at = chrono::Utc::now()
            .checked_add_signed(lifetime)
            .ok_or_else(|| ApiError::internal("Invalid refresh token expiry"))?;

        RefreshTokenRepository::new(self.db.pool())
            .create(&NewRefreshToken {
                member_id,
                token: token.clone(),
                expires_at: expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
            .await?;

        Ok(token)
    }
}

/// POST /auth/register - Register a new member.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid registration data")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MemberResponse>>), ApiError> {
    let mut request = RegistrationRequest::new(req.email, req.password, req.name)
        .with_confirm_password(req.confirm_password)
        .with_agreements(req.terms_agreed, req.privacy_agreed);
    if let Some(phone) = req.phone.filter(|p| !p.trim().is_empty()) {
        request = request.with_phone(phone.trim());
    }
    if let Some(address) = req.address.filter(|a| !a.trim().is_empty()) {
        request = request.with_address(address.trim());
    }

    let repo = MemberRepository::new(state.db.pool());
    let member = register_member(&repo, request)
        .await
        .map_err(crate::LibraryError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MemberResponse::from(&member))),
    ))
}

/// POST /auth/login - Exchange credentials for tokens.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account is not active"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let repo = MemberRepository::new(state.db.pool());
    let member = authenticate(&repo, req.email.trim(), &req.password).await?;

    let access_token = state.generate_access_token(&member)?;
    let refresh_token = state.issue_refresh_token(member.id).await?;

    Ok(Json(ApiResponse::new(LoginResponse {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: state.access_token_expiry,
        member: MemberResponse::from(&member),
    })))
}

/// POST /auth/logout - Revoke a refresh token.
///
/// Unknown or already revoked tokens are not an error.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    request_body = LogoutRequest,
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let revoked = RefreshTokenRepository::new(state.db.pool())
        .revoke(&req.refresh_token)
        .await?;
    tracing::debug!(revoked, "Logout");

    Ok(Json(ApiResponse::new(())))
}

/// POST /auth/refresh - Rotate a refresh token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New tokens", body = RefreshResponse),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 403, description = "Account is not active")
    )
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let tokens = RefreshTokenRepository::new(state.db.pool());
    let stored = tokens
        .get_valid_token(&req.refresh_token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let member = MemberRepository::new(state.db.pool())
        .get_by_id(stored.member_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Member not found"))?;

    if !member.is_active() {
        return Err(ApiError::forbidden("Account is not active"));
    }

    // A token that was revoked concurrently must not be rotated twice.
    if !tokens.revoke(&req.refresh_token).await? {
        return Err(ApiError::unauthorized("Invalid or expired refresh token"));
    }

    let access_token = state.generate_access_token(&member)?;
    let refresh_token = state.issue_refresh_token(member.id).await?;

    tracing::debug!(email = %mask_email(&member.email), "Token refreshed");

    Ok(Json(ApiResponse::new(RefreshResponse {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: state.access_token_expiry,
    })))
}

/// GET /auth/me - Current member.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current member", body = MemberResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<MemberResponse>>, ApiError> {
    let member = MemberRepository::new(state.db.pool())
        .get_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Member not found"))?;

    Ok(Json(ApiResponse::new(MemberResponse::from(&member))))
}

/// GET /auth/check-email - Whether an email is already registered.
#[utoipa::path(
    get,
    path = "/auth/check-email",
    tag = "auth",
    params(EmailQuery),
    responses((status = 200, description = "Duplicate check", body = EmailExistsResponse))
)]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ApiResponse<EmailExistsResponse>>, ApiError> {
    let email = query.email.trim().to_string();
    let exists = MemberRepository::new(state.db.pool())
        .email_exists(&email)
        .await?;

    Ok(Json(ApiResponse::new(EmailExistsResponse { email, exists })))
}
