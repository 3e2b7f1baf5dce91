//! Password hashing and policy.
//!
//! Uses Argon2id for hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Special characters accepted in passwords besides letters and digits.
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    #[error("password may only contain letters, digits and @$!%*?&")]
    InvalidChars,

    #[error("password must contain both letters and digits")]
    MissingLetterOrDigit,

    #[error("password hashing failed: {0}")]
    HashError(String),

    #[error("invalid password hash format")]
    InvalidHash,

    /// Wrong password.
    #[error("password verification failed")]
    VerificationFailed,
}

/// Argon2id with m = 64 MiB, t = 3, p = 4.
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(64 * 1024, 3, 4, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password using Argon2id.
///
/// The password is checked against [`validate_password`] first. Returns a
/// PHC-formatted string that embeds the salt and parameters.
///
/// ```
/// use library_board::auth::hash_password;
///
/// let hash = hash_password("reader2024").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Parameters are read from the hash itself, so older hashes keep working
/// if the cost settings change.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Hash of a password no member has, computed once on first use.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("Unregistered1").ok())
        .as_deref()
}

/// Run a full verification against a throwaway hash.
///
/// Used on the unknown-email login path so it costs the same Argon2 work as a
/// wrong password.
pub(crate) fn verify_dummy_password(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

/// Check the password policy.
///
/// 8-20 characters drawn from letters, digits and `@$!%*?&`, with at least
/// one letter and one digit.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
    {
        return Err(PasswordError::InvalidChars);
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(PasswordError::MissingLetterOrDigit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_hash_is_full_cost() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536,t=3,p=4"));
        assert!(verify_password("reader2024", hash).is_err());

        verify_dummy_password("reader2024");
        assert_eq!(dummy_hash(), Some(hash));
    }

    #[test]
    fn test_hash_password_success() {
        let hash = hash_password("reader2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
        assert!(hash.contains("m=65536,t=3,p=4"));
    }

    #[test]
    fn test_hash_password_different_salts() {
        let hash1 = hash_password("same1234").unwrap();
        let hash2 = hash_password("same1234").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct99").unwrap();
        assert!(verify_password("correct99", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong999", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("any12345", "not_a_valid_hash"),
            Err(PasswordError::InvalidHash)
        ));
    }

    #[test]
    fn test_validate_password_length_bounds() {
        assert!(matches!(validate_password("abc123"), Err(PasswordError::TooShort)));
        assert!(validate_password("abcd1234").is_ok());
        assert!(validate_password("abcdefghij123456789k").is_ok());
        assert!(matches!(
            validate_password("abcdefghij1234567890x"),
            Err(PasswordError::TooLong)
        ));
    }

    #[test]
    fn test_validate_password_composition() {
        assert!(matches!(
            validate_password("onlyletters"),
            Err(PasswordError::MissingLetterOrDigit)
        ));
        assert!(matches!(
            validate_password("12345678"),
            Err(PasswordError::MissingLetterOrDigit)
        ));
        assert!(matches!(
            validate_password("pass word1"),
            Err(PasswordError::InvalidChars)
        ));
        assert!(matches!(
            validate_password("pass#word1"),
            Err(PasswordError::InvalidChars)
        ));
        assert!(validate_password("p@ss$w0rd!").is_ok());
    }

    #[test]
    fn test_hash_password_rejects_policy_violation() {
        assert!(matches!(hash_password("short1"), Err(PasswordError::TooShort)));
    }
}
