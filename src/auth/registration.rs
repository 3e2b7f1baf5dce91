//! Member registration.

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::masking::mask_email;
use crate::auth::validation::{
    validate_address, validate_email, validate_name, validate_phone, ValidationError,
};
use crate::auth::{hash_password, validate_password, PasswordError};
use crate::db::{Member, MemberRepository, NewMember, Role};
use crate::LibraryError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("terms of service must be accepted")]
    TermsNotAgreed,

    #[error("privacy policy must be accepted")]
    PrivacyNotAgreed,

    #[error("email already registered")]
    EmailExists,

    #[error("database error: {0}")]
    Database(String),
}

impl From<RegistrationError> for LibraryError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::EmailExists => LibraryError::Conflict(e.to_string()),
            RegistrationError::Database(msg) => LibraryError::Database(msg),
            RegistrationError::Password(PasswordError::HashError(msg)) => {
                LibraryError::Internal(format!("password hashing failed: {msg}"))
            }
            other => LibraryError::Validation(other.to_string()),
        }
    }
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub terms_agreed: bool,
    pub privacy_agreed: bool,
}

impl RegistrationRequest {
    /// Create a request with both agreements accepted and the password
    /// confirmed.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            confirm_password: password.clone(),
            password,
            name: name.into(),
            phone: None,
            address: None,
            terms_agreed: true,
            privacy_agreed: true,
        }
    }

    pub fn with_confirm_password(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = confirm.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_agreements(mut self, terms: bool, privacy: bool) -> Self {
        self.terms_agreed = terms;
        self.privacy_agreed = privacy;
        self
    }

    /// Run every field check without touching the database.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        validate_name(&self.name)?;
        if let Some(phone) = non_blank(&self.phone) {
            validate_phone(phone)?;
        }
        if let Some(address) = non_blank(&self.address) {
            validate_address(address)?;
        }
        if !self.terms_agreed {
            return Err(RegistrationError::TermsNotAgreed);
        }
        if !self.privacy_agreed {
            return Err(RegistrationError::PrivacyNotAgreed);
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Register a new member.
///
/// New members start as REGULAR / ACTIVE / USER with today's join date.
pub async fn register(
    repo: &MemberRepository<'_>,
    request: RegistrationRequest,
) -> Result<Member, RegistrationError> {
    register_with_role(repo, request, Role::User).await
}

/// Register a new member with a specific role (used to seed staff accounts).
pub async fn register_with_role(
    repo: &MemberRepository<'_>,
    request: RegistrationRequest,
    role: Role,
) -> Result<Member, RegistrationError> {
    request.validate()?;

    let email = request.email.trim();
    let masked = mask_email(email);

    if repo
        .email_exists(email)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        warn!(email = %masked, "Registration rejected: email already registered");
        return Err(RegistrationError::EmailExists);
    }

    let password_hash = hash_password(&request.password)?;

    let mut new_member = NewMember::new(email, password_hash, request.name.trim()).with_role(role);
    if let Some(phone) = non_blank(&request.phone) {
        new_member = new_member.with_phone(phone);
    }
    if let Some(address) = non_blank(&request.address) {
        new_member = new_member.with_address(address);
    }

    let member = repo.create(&new_member).await.map_err(|e| match e {
        LibraryError::Conflict(_) => RegistrationError::EmailExists,
        other => RegistrationError::Database(other.to_string()),
    })?;

    info!(
        email = %masked,
        member_id = member.id,
        role = %member.role,
        "New member registered"
    );

    Ok(member)
}
