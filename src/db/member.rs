//! Member model.
//!
//! Members are identified by email and carry a role, a membership tier
//! and an account status.

use std::fmt;
use std::str::FromStr;

/// Member role for permission management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Role {
    /// Regular library user.
    #[default]
    User = 1,
    /// Librarian staff.
    Librarian = 2,
    /// Administrator.
    Admin = 3,
}

impl Role {
    /// Database / token representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Librarian => "LIBRARIAN",
            Role::Admin => "ADMIN",
        }
    }

    /// Authority key, e.g. `ROLE_USER`.
    pub fn key(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }

    /// Display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Librarian => "Librarian",
            Role::Admin => "Administrator",
        }
    }

    /// Numeric privilege level (1-3).
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Check if this role has at least the required permission level.
    ///
    /// ```
    /// use library_board::db::Role;
    ///
    /// assert!(Role::Admin.can_access(Role::Librarian));
    /// assert!(!Role::User.can_access(Role::Librarian));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("ROLE_").unwrap_or(s);
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "LIBRARIAN" => Ok(Role::Librarian),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Membership tier with its lending limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum MemberType {
    #[default]
    Regular,
    Silver,
    Gold,
    Vip,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Regular => "REGULAR",
            MemberType::Silver => "SILVER",
            MemberType::Gold => "GOLD",
            MemberType::Vip => "VIP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MemberType::Regular => "Regular member",
            MemberType::Silver => "Silver member",
            MemberType::Gold => "Gold member",
            MemberType::Vip => "VIP member",
        }
    }

    /// Tier level, 1 (regular) to 4 (VIP).
    pub fn level(&self) -> u8 {
        match self {
            MemberType::Regular => 1,
            MemberType::Silver => 2,
            MemberType::Gold => 3,
            MemberType::Vip => 4,
        }
    }

    /// Maximum number of books on loan at once.
    pub fn max_rental_books(&self) -> u32 {
        match self {
            MemberType::Regular => 3,
            MemberType::Silver => 5,
            MemberType::Gold => 7,
            MemberType::Vip => 10,
        }
    }

    /// Loan period in days.
    pub fn rental_days(&self) -> u32 {
        match self {
            MemberType::Regular => 14,
            MemberType::Silver => 21,
            MemberType::Gold => 28,
            MemberType::Vip => 30,
        }
    }

    pub fn max_reservations(&self) -> u32 {
        match self {
            MemberType::Regular => 1,
            MemberType::Silver => 2,
            MemberType::Gold => 3,
            MemberType::Vip => 5,
        }
    }

    /// Maximum renewals per loan; `None` means unlimited.
    pub fn max_renewals(&self) -> Option<u32> {
        match self {
            MemberType::Regular => Some(1),
            MemberType::Silver => Some(2),
            MemberType::Gold => Some(3),
            MemberType::Vip => None,
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REGULAR" => Ok(MemberType::Regular),
            "SILVER" => Ok(MemberType::Silver),
            "GOLD" => Ok(MemberType::Gold),
            "VIP" => Ok(MemberType::Vip),
            _ => Err(format!("unknown member type: {s}")),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberStatus {
    #[default]
    Active,
    Suspended,
    Withdrawn,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Suspended => "SUSPENDED",
            MemberStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Suspended => "Suspended",
            MemberStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Whether an account may move from this status to `target`.
    ///
    /// Withdrawal is terminal.
    pub fn can_transition_to(&self, target: MemberStatus) -> bool {
        match self {
            MemberStatus::Active => {
                matches!(target, MemberStatus::Suspended | MemberStatus::Withdrawn)
            }
            MemberStatus::Suspended => {
                matches!(target, MemberStatus::Active | MemberStatus::Withdrawn)
            }
            MemberStatus::Withdrawn => false,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(MemberStatus::Active),
            "SUSPENDED" => Ok(MemberStatus::Suspended),
            "WITHDRAWN" => Ok(MemberStatus::Withdrawn),
            _ => Err(format!("unknown member status: {s}")),
        }
    }
}

/// A registered member.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: i64,
    /// Login identifier (unique, case-insensitive).
    pub email: String,
    /// Argon2 password hash.
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Date the member joined (`YYYY-MM-DD`).
    pub join_date: String,
    pub member_type: MemberType,
    pub status: MemberStatus,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl Member {
    /// Whether the member may sign in.
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role.can_access(required)
    }
}

/// Data for creating a new member.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    /// Password hash (already hashed with Argon2).
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub member_type: MemberType,
    pub status: MemberStatus,
    pub role: Role,
}

impl NewMember {
    /// Create a regular, active user-role member.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            phone: None,
            address: None,
            member_type: MemberType::Regular,
            status: MemberStatus::Active,
            role: Role::User,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_member_type(mut self, member_type: MemberType) -> Self {
        self.member_type = member_type;
        self
    }
}

/// Partial update for a member.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub member_type: Option<MemberType>,
    pub status: Option<MemberStatus>,
    pub role: Option<Role>,
}

impl MemberUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn member_type(mut self, member_type: MemberType) -> Self {
        self.member_type = Some(member_type);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.password.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.member_type.is_none()
            && self.status.is_none()
            && self.role.is_none()
    }
}
