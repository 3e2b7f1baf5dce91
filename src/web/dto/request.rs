//! Request DTOs for the web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Logout request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    pub refresh_token: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Member registration request.
///
/// Field rules (password policy, email format, phone pattern) are enforced
/// by the registration service; only control characters are rejected here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[validate(custom(function = "no_control_chars"))]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub address: Option<String>,
    #[serde(default)]
    pub terms_agreed: bool,
    #[serde(default)]
    pub privacy_agreed: bool,
}

/// Comment create/update request.
///
/// Length is checked by the comment service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
}

/// `?page=&size=` query for the board list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Page size (default 8, max 100).
    pub size: Option<i64>,
}

/// `?email=` query for the duplicate check.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    pub email: String,
}
