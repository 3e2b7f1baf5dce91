//! Input validation for member registration.

use thiserror::Error;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Minimum name length.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum name length.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum address length.
pub const MAX_ADDRESS_LENGTH: usize = 200;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is required")]
    EmailEmpty,

    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    #[error("invalid email format")]
    EmailInvalidFormat,

    #[error("name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters")]
    NameLength,

    /// Phone must look like `010-1234-5678`.
    #[error("invalid phone number format (e.g. 010-1234-5678)")]
    PhoneInvalidFormat,

    #[error("address must be at most {MAX_ADDRESS_LENGTH} characters")]
    AddressTooLong,
}

/// Validate an email address.
///
/// ```
/// use library_board::auth::validation::validate_email;
///
/// assert!(validate_email("reader@example.com").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if domain.split('.').any(|part| part.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Validate a member name (2-50 characters after trimming).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}

/// Validate a phone number of the form `ddd-dddd-dddd`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let groups: Vec<&str> = phone.split('-').collect();
    let shape_ok = groups.len() == 3
        && groups
            .iter()
            .zip([3, 4, 4])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_digit()));
    if !shape_ok {
        return Err(ValidationError::PhoneInvalidFormat);
    }
    Ok(())
}

/// Validate a postal address.
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::AddressTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("  reader@library.co.kr ").is_ok());
        assert_eq!(validate_email(""), Err(ValidationError::EmailEmpty));
        assert_eq!(
            validate_email("reader"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("@example.com"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("reader@localhost"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("reader@example..com"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("a b@example.com"),
            Err(ValidationError::EmailInvalidFormat)
        );
    }

    #[test]
    fn test_validate_email_length() {
        let long = format!("{}@example.com", "a".repeat(90));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Kim").is_ok());
        assert!(validate_name("김철수").is_ok());
        assert_eq!(validate_name("K"), Err(ValidationError::NameLength));
        assert_eq!(validate_name(&"n".repeat(51)), Err(ValidationError::NameLength));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_err());
        assert!(validate_phone("010-123-5678").is_err());
        assert!(validate_phone("010-1234-567a").is_err());
        assert!(validate_phone("010-1234-5678-9").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("123 Main St").is_ok());
        assert!(validate_address(&"x".repeat(201)).is_err());
    }
}
