//! Masking of personal data before it reaches the logs.

/// Mask an email address for logging.
///
/// ```
/// use library_board::auth::mask_email;
///
/// assert_eq!(mask_email("reader@example.com"), "r***@example.com");
/// assert_eq!(mask_email("ab@example.com"), "a*@example.com");
/// assert_eq!(mask_email(""), "N/A");
/// ```
pub fn mask_email(email: &str) -> String {
    if email.is_empty() {
        return "N/A".to_string();
    }

    let at = match email.find('@') {
        Some(0) | None => return email.to_string(),
        Some(at) => at,
    };

    let (local, domain) = email.split_at(at);
    let mut chars = local.chars();
    let first = chars.next().unwrap_or_default();
    let stars = if local.chars().count() <= 2 { "*" } else { "***" };

    format!("{first}{stars}{domain}")
}
