//! Member repository.
//!
//! CRUD operations for members.

use sqlx::{QueryBuilder, SqlitePool};

use super::member::{Member, MemberStatus, MemberType, MemberUpdate, NewMember, Role};
use crate::{LibraryError, Result};

const MEMBER_COLUMNS: &str = "id, email, password, name, phone, address, join_date, member_type,
                              status, role, created_at, updated_at";

/// Raw member row; enum columns are stored as text.
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    email: String,
    password: String,
    name: String,
    phone: Option<String>,
    address: Option<String>,
    join_date: String,
    member_type: String,
    status: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl MemberRow {
    fn into_member(self) -> Member {
        Member {
            id: self.id,
            email: self.email,
            password: self.password,
            name: self.name,
            phone: self.phone,
            address: self.address,
            join_date: self.join_date,
            member_type: self.member_type.parse().unwrap_or(MemberType::Regular),
            status: self.status.parse().unwrap_or(MemberStatus::Suspended),
            role: self.role.parse().unwrap_or(Role::User),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for member CRUD operations.
pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new MemberRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &'a SqlitePool {
        self.pool
    }

    /// Insert a new member and return it.
    ///
    /// A duplicate email surfaces as [`LibraryError::Conflict`].
    pub async fn create(&self, new_member: &NewMember) -> Result<Member> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO members (email, password, name, phone, address, member_type, status, role)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_member.email)
        .bind(&new_member.password)
        .bind(&new_member.name)
        .bind(&new_member.phone)
        .bind(&new_member.address)
        .bind(new_member.member_type.as_str())
        .bind(new_member.status.as_str())
        .bind(new_member.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                LibraryError::Conflict("email already registered".to_string())
            }
            other => LibraryError::Database(other.to_string()),
        })?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::NotFound("member".to_string()))
    }

    /// Get a member by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?");
        let row: Option<MemberRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(MemberRow::into_member))
    }

    /// Get a member by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE email = ? COLLATE NOCASE");
        let row: Option<MemberRow> = sqlx::query_as(&sql)
            .bind(email.trim())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(MemberRow::into_member))
    }

    /// Check whether an email is already registered (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE email = ? COLLATE NOCASE)")
                .bind(email.trim())
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Update a member by ID.
    ///
    /// Only fields set in the update are modified. Returns `None` if the
    /// member does not exist.
    pub async fn update(&self, id: i64, update: &MemberUpdate) -> Result<Option<Member>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE members SET ");
        let mut separated = query.separated(", ");

        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }
        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref phone) = update.phone {
            separated.push("phone = ");
            separated.push_bind_unseparated(phone.clone());
        }
        if let Some(ref address) = update.address {
            separated.push("address = ");
            separated.push_bind_unseparated(address.clone());
        }
        if let Some(member_type) = update.member_type {
            separated.push("member_type = ");
            separated.push_bind_unseparated(member_type.as_str());
        }
        if let Some(status) = update.status {
            separated.push("status = ");
            separated.push_bind_unseparated(status.as_str());
        }
        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str());
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Count all members.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_member_defaults() {
        let db = setup_db().await;
        let repo = MemberRepository::new(db.pool());

        let member = repo
            .create(&NewMember::new("reader@example.com", "hash", "Reader"))
            .await
            .unwrap();

        assert_eq!(member.id, 1);
        assert_eq!(member.email, "reader@example.com");
        assert_eq!(member.member_type, MemberType::Regular);
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.role, Role::User);
        assert_eq!(member.join_date.len(), 10);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let db = setup_db().await;
        let repo = MemberRepository::new(db.pool());

        repo.create(&NewMember::new("reader@example.com", "hash", "Reader"))
            .await
            .unwrap();
        let result = repo
            .create(&NewMember::new("READER@example.com", "hash", "Other"))
            .await;

        assert!(matches!(result, Err(LibraryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_by_email_case_insensitive() {
        let db = setup_db().await;
        let repo = MemberRepository::new(db.pool());

        repo.create(&NewMember::new("Reader@Example.com", "hash", "Reader"))
            .await
            .unwrap();

        assert!(repo.get_by_email("reader@example.com").await.unwrap().is_some());
        assert!(repo.email_exists("READER@EXAMPLE.COM").await.unwrap());
        assert!(!repo.email_exists("nobody@example.com").await.unwrap());
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_member() {
        let db = setup_db().await;
        let repo = MemberRepository::new(db.pool());

        let member = repo
            .create(&NewMember::new("staff@example.com", "hash", "Staff"))
            .await
            .unwrap();

        let updated = repo
            .update(
                member.id,
                &MemberUpdate::new()
                    .role(Role::Librarian)
                    .member_type(MemberType::Gold)
                    .status(MemberStatus::Suspended),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.role, Role::Librarian);
        assert_eq!(updated.member_type, MemberType::Gold);
        assert_eq!(updated.status, MemberStatus::Suspended);

        let missing = repo
            .update(999, &MemberUpdate::new().name("Nobody"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_counts() {
        let db = setup_db().await;
        let repo = MemberRepository::new(db.pool());

        let a = repo
            .create(&NewMember::new("a@example.com", "hash", "Alpha"))
            .await
            .unwrap();
        repo.create(&NewMember::new("b@example.com", "hash", "Bravo"))
            .await
            .unwrap();
        repo.update(a.id, &MemberUpdate::new().status(MemberStatus::Withdrawn))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
