use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const AUDIT_CREATED_BLOTTER: &str = "CREATED BLOTTER";
pub const AUDIT_UPDATED_BLOTTER: &str = "UPDATED BLOTTER";
pub const AUDIT_DELETED_BLOTTER: &str = "DELETED BLOTTER";
pub const AUDIT_UPDATED_REPORT: &str = "UPDATED REPORT";
pub const AUDIT_UPDATED_LUPON: &str = "UPDATED LUPON ROSTER";

/// Who did what, and when (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AuditLog {
    pub id: Uuid,
    /// `None` for actions taken by the system itself.
    pub actor_id: Option<i64>,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// API response for an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuditLogResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<i64>,
    pub action: String,
    pub details: String,
    pub created_at: String,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(a: AuditLog) -> Self {
        Self {
            id: a.id.to_string(),
            actor_id: a.actor_id,
            action: a.action,
            details: a.details,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AuditLogParams {
    pub actor_id: Option<i64>,
    pub limit: Option<i64>,
}
