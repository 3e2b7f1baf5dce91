//! Credential checks and account status changes.

use tracing::{info, warn};

use crate::auth::masking::mask_email;
use crate::auth::password::verify_dummy_password;
use crate::auth::verify_password;
use crate::db::{Member, MemberRepository, MemberStatus, MemberUpdate, RefreshTokenRepository};
use crate::{LibraryError, Result};

/// Message shared by every credential failure so callers cannot probe for
/// registered emails.
const BAD_CREDENTIALS: &str = "invalid email or password";

/// Authenticate a member by email and password.
///
/// Unknown emails and wrong passwords both yield [`LibraryError::Auth`]
/// after one Argon2 verification.
/// Members that are not ACTIVE yield [`LibraryError::Permission`].
pub async fn authenticate(
    repo: &MemberRepository<'_>,
    email: &str,
    password: &str,
) -> Result<Member> {
    let masked = mask_email(email.trim());

    let Some(member) = repo.get_by_email(email).await? else {
        verify_dummy_password(password);
        warn!(email = %masked, "Login failed: unknown email");
        return Err(LibraryError::Auth(BAD_CREDENTIALS.to_string()));
    };

    if verify_password(password, &member.password).is_err() {
        warn!(email = %masked, "Login failed: wrong password");
        return Err(LibraryError::Auth(BAD_CREDENTIALS.to_string()));
    }

    if !member.is_active() {
        warn!(email = %masked, status = %member.status, "Login refused: account not active");
        return Err(LibraryError::Permission(format!(
            "account is {}",
            member.status.description().to_lowercase()
        )));
    }

    info!(email = %masked, member_id = member.id, "Login succeeded");
    Ok(member)
}

/// Move a member to a new account status.
///
/// Transitions outside the allowed table are rejected with a validation error.
/// Leaving ACTIVE revokes every refresh token of the member.
pub async fn change_status(
    repo: &MemberRepository<'_>,
    member_id: i64,
    status: MemberStatus,
) -> Result<Member> {
    let member = repo
        .get_by_id(member_id)
        .await?
        .ok_or_else(|| LibraryError::NotFound("member".to_string()))?;

    if !member.status.can_transition_to(status) {
        return Err(LibraryError::Validation(format!(
            "cannot change status from {} to {}",
            member.status, status
        )));
    }

    let updated = repo
        .update(member_id, &MemberUpdate::new().status(status))
        .await?
        .ok_or_else(|| LibraryError::NotFound("member".to_string()))?;

    info!(
        member_id,
        from = %member.status,
        to = %status,
        "Member status changed"
    );

    if status != MemberStatus::Active {
        let revoked = RefreshTokenRepository::new(repo.pool())
            .revoke_all_for_member(member_id)
            .await?;
        info!(member_id, revoked, "Refresh tokens revoked");
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{register, RegistrationRequest};
    use crate::db::NewRefreshToken;
    use crate::Database;

    async fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let member = register(
            &MemberRepository::new(db.pool()),
            RegistrationRequest::new("reader@example.com", "reader2024", "Reader"),
        )
        .await
        .unwrap();
        (db, member.id)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (db, id) = setup().await;
        let repo = MemberRepository::new(db.pool());

        let member = authenticate(&repo, "READER@example.com", "reader2024")
            .await
            .unwrap();
        assert_eq!(member.id, id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_share_message() {
        let (db, _) = setup().await;
        let repo = MemberRepository::new(db.pool());

        let wrong_password = authenticate(&repo, "reader@example.com", "wrong2024")
            .await
            .unwrap_err();
        let unknown = authenticate(&repo, "nobody@example.com", "reader2024")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, LibraryError::Auth(_)));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_suspended_member() {
        let (db, id) = setup().await;
        let repo = MemberRepository::new(db.pool());

        change_status(&repo, id, MemberStatus::Suspended)
            .await
            .unwrap();
        let result = authenticate(&repo, "reader@example.com", "reader2024").await;
        assert!(matches!(result, Err(LibraryError::Permission(_))));
    }

    #[tokio::test]
    async fn test_change_status_transitions() {
        let (db, id) = setup().await;
        let repo = MemberRepository::new(db.pool());

        let suspended = change_status(&repo, id, MemberStatus::Suspended)
            .await
            .unwrap();
        assert_eq!(suspended.status, MemberStatus::Suspended);

        let active = change_status(&repo, id, MemberStatus::Active).await.unwrap();
        assert_eq!(active.status, MemberStatus::Active);

        change_status(&repo, id, MemberStatus::Withdrawn)
            .await
            .unwrap();
        let result = change_status(&repo, id, MemberStatus::Active).await;
        assert!(matches!(result, Err(LibraryError::Validation(_))));

        let missing = change_status(&repo, 999, MemberStatus::Active).await;
        assert!(matches!(missing, Err(LibraryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leaving_active_revokes_refresh_tokens() {
        let (db, id) = setup().await;
        let repo = MemberRepository::new(db.pool());
        let tokens = RefreshTokenRepository::new(db.pool());

        for value in ["first", "second"] {
            tokens
                .create(&NewRefreshToken {
                    member_id: id,
                    token: value.to_string(),
                    expires_at: "2099-12-31 23:59:59".to_string(),
                })
                .await
                .unwrap();
        }

        change_status(&repo, id, MemberStatus::Suspended)
            .await
            .unwrap();
        assert!(tokens.get_valid_token("first").await.unwrap().is_none());
        assert!(tokens.get_valid_token("second").await.unwrap().is_none());
    }
}
