//! Configuration module for the library board.

use serde::Deserialize;
use std::path::Path;

use crate::{LibraryError, Result};

/// Environment variable that overrides `web.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "LIBRARY_JWT_SECRET";

/// Longest accepted access token lifetime (30 days).
pub const MAX_ACCESS_TOKEN_EXPIRY_SECS: u64 = 30 * 24 * 60 * 60;

/// Longest accepted refresh token lifetime.
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: u64 = 365;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Site name shown on the home endpoint.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Timezone for displaying dates (e.g., "Asia/Seoul", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_site_name() -> String {
    "Library".to_string()
}

fn default_timezone() -> String {
    "Asia/Seoul".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_name: default_site_name(),
            timezone: default_timezone(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/library.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Attachment storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Root directory for uploaded files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum size of a single upload in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Lowercase extensions accepted for upload.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    [
        "jpg", "jpeg", "png", "pdf", "gif", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt",
        "zip", "hwp",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/library.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_token_expiry_secs: u64,
    /// Refresh token expiry in days.
    #[serde(default = "default_jwt_refresh_expiry")]
    pub jwt_refresh_token_expiry_days: u64,
    /// Login attempts allowed per client per minute.
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Key the login limiter on `X-Forwarded-For`/`X-Real-IP`.
    ///
    /// Only enable behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_jwt_access_expiry() -> u64 {
    1800 // 30 minutes
}

fn default_jwt_refresh_expiry() -> u64 {
    7
}

fn default_login_rate_limit() -> u32 {
    10
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_access_token_expiry_secs: default_jwt_access_expiry(),
            jwt_refresh_token_expiry_days: default_jwt_refresh_expiry(),
            login_rate_limit: default_login_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Attachment storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LibraryError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LibraryError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `LIBRARY_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var(JWT_SECRET_ENV) {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(LibraryError::Config(format!(
                "jwt_secret is not set. Set it in config.toml or via {JWT_SECRET_ENV}."
            )));
        }
        let access = self.web.jwt_access_token_expiry_secs;
        if access == 0 || access > MAX_ACCESS_TOKEN_EXPIRY_SECS {
            return Err(LibraryError::Config(format!(
                "web.jwt_access_token_expiry_secs must be between 1 and {MAX_ACCESS_TOKEN_EXPIRY_SECS}"
            )));
        }
        let refresh = self.web.jwt_refresh_token_expiry_days;
        if refresh == 0 || refresh > MAX_REFRESH_TOKEN_EXPIRY_DAYS {
            return Err(LibraryError::Config(format!(
                "web.jwt_refresh_token_expiry_days must be between 1 and {MAX_REFRESH_TOKEN_EXPIRY_DAYS}"
            )));
        }
        if self.files.max_file_size == 0 {
            return Err(LibraryError::Config(
                "files.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.files.allowed_extensions.is_empty() {
            return Err(LibraryError::Config(
                "files.allowed_extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
