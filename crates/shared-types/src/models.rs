use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portal role controlling access to case operations.
///
/// - `Resident`: files blotters and reports, reads their own cases.
/// - `Tanod`: barangay watchman. Files on-site and flags cases for the Secretary.
/// - `Secretary`: runs the case workflow (status changes, hearings, settlement).
/// - `Official`: Punong Barangay / Kagawad. Everything the Secretary can do.
/// - `Admin`: manages the Lupon roster, deletes records, reads the audit trail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Resident,
    Tanod,
    Secretary,
    Official,
    Admin,
}

/// Valid role values matching the DB CHECK constraint.
pub const USER_ROLES: &[&str] = &["resident", "tanod", "secretary", "official", "admin"];

impl UserRole {
    /// Parse from the JWT `role` claim. Unknown values default to Resident.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "tanod" => UserRole::Tanod,
            "secretary" => UserRole::Secretary,
            "official" => UserRole::Official,
            "admin" => UserRole::Admin,
            _ => UserRole::Resident,
        }
    }

    /// Lowercase string for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Resident => "resident",
            UserRole::Tanod => "tanod",
            UserRole::Secretary => "secretary",
            UserRole::Official => "official",
            UserRole::Admin => "admin",
        }
    }

    /// Human label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Resident => "Resident",
            UserRole::Tanod => "Tanod",
            UserRole::Secretary => "Secretary",
            UserRole::Official => "Official",
            UserRole::Admin => "Admin",
        }
    }

    /// Returns true if this role satisfies the `required` role.
    pub fn satisfies(&self, required: &UserRole) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Official => !matches!(required, UserRole::Admin),
            UserRole::Secretary => matches!(
                required,
                UserRole::Secretary | UserRole::Tanod | UserRole::Resident
            ),
            UserRole::Tanod => matches!(required, UserRole::Tanod | UserRole::Resident),
            UserRole::Resident => matches!(required, UserRole::Resident),
        }
    }

    /// Anyone working for the barangay, as opposed to a resident.
    pub fn is_staff(&self) -> bool {
        self.satisfies(&UserRole::Tanod)
    }
}

/// The authenticated user performing an operation.
///
/// Every mutating service call receives one explicitly; audit entries,
/// `processed_by` and `created_by` columns are filled from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// A portal user (DB row). Accounts are provisioned outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn role(&self) -> UserRole {
        UserRole::from_str_or_default(&self.role)
    }
}
