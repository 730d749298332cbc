use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

/// Working days tracked in the roster, indexed by `day_of_week` (0 = Monday).
pub const WORKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

pub const DEFAULT_LUPON_POSITION: &str = "Lupong Tagapamayapa";

pub fn is_valid_workday(day_of_week: i16) -> bool {
    (0..WORKDAYS.len() as i16).contains(&day_of_week)
}

/// A member of the Lupon mediation panel (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LuponMember {
    pub id: Uuid,
    pub full_name: String,
    pub position: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// API response for a Lupon member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LuponMemberResponse {
    pub id: String,
    pub full_name: String,
    pub position: String,
    pub is_active: bool,
}

impl From<LuponMember> for LuponMemberResponse {
    fn from(m: LuponMember) -> Self {
        Self {
            id: m.id.to_string(),
            full_name: m.full_name,
            position: m.position,
            is_active: m.is_active,
        }
    }
}

/// One cell of the availability roster (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LuponAvailability {
    pub member_id: Uuid,
    pub day_of_week: i16,
    pub is_available: bool,
}

fn default_position() -> String {
    DEFAULT_LUPON_POSITION.to_string()
}

fn default_true() -> bool {
    true
}

/// Request DTO for adding a Lupon member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateLuponMemberRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Full name is required"))
    )]
    pub full_name: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request DTO for taking a member off (or back onto) the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateLuponMemberRequest {
    pub is_active: bool,
}

/// Request DTO for setting one roster cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SetAvailabilityRequest {
    pub member_id: Uuid,
    /// 0 = Monday .. 4 = Friday.
    pub day_of_week: i16,
    pub is_available: bool,
}

/// One roster row: a member and their availability Monday through Friday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityRow {
    pub member_id: String,
    pub full_name: String,
    pub position: String,
    pub days: Vec<bool>,
}

/// Weekly availability roster of active Lupon members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityMatrix {
    pub days: Vec<String>,
    pub members: Vec<AvailabilityRow>,
}

/// Build the roster. Inactive members are left out; cells without a stored
/// entry read as unavailable. Member order is preserved.
pub fn build_matrix(members: &[LuponMember], availability: &[LuponAvailability]) -> AvailabilityMatrix {
    let mut cells: HashMap<(Uuid, i16), bool> = HashMap::new();
    for a in availability {
        cells.insert((a.member_id, a.day_of_week), a.is_available);
    }

    let rows = members
        .iter()
        .filter(|m| m.is_active)
        .map(|m| AvailabilityRow {
            member_id: m.id.to_string(),
            full_name: m.full_name.clone(),
            position: m.position.clone(),
            days: (0..WORKDAYS.len() as i16)
                .map(|day| cells.get(&(m.id, day)).copied().unwrap_or(false))
                .collect(),
        })
        .collect();

    AvailabilityMatrix {
        days: WORKDAYS.iter().map(|d| d.to_string()).collect(),
        members: rows,
    }
}
