use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::blotter::full_name;

/// Handling status of a general (non-blotter) report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ReportStatus {
    New,
    #[serde(rename = "Under Verification")]
    UnderVerification,
    #[serde(rename = "Action Taken")]
    ActionTaken,
    Resolved,
    Archived,
}

/// Valid report status values matching the DB CHECK constraint.
pub const REPORT_STATUSES: &[&str] = &[
    "New",
    "Under Verification",
    "Action Taken",
    "Resolved",
    "Archived",
];

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::UnderVerification => "Under Verification",
            Self::ActionTaken => "Action Taken",
            Self::Resolved => "Resolved",
            Self::Archived => "Archived",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Self::New),
            "Under Verification" => Some(Self::UnderVerification),
            "Action Taken" => Some(Self::ActionTaken),
            "Resolved" => Some(Self::Resolved),
            "Archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A general report filed by a resident (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Report {
    pub id: Uuid,
    pub informant_id: i64,
    pub complainant_first_name: String,
    pub complainant_middle_name: Option<String>,
    pub complainant_last_name: String,
    pub complainant_suffix: Option<String>,
    pub complainant_address: String,
    pub complainant_contact_number: String,
    pub date_of_incident: NaiveDate,
    pub location_of_incident: String,
    pub report_details: String,
    pub status: String,
    pub action_taken: Option<String>,
    pub date_filed: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// First 30 characters of the details, as quoted in notifications.
    pub fn excerpt(&self) -> String {
        let mut excerpt: String = self.report_details.chars().take(30).collect();
        if self.report_details.chars().count() > 30 {
            excerpt.push_str("...");
        }
        excerpt
    }
}

/// API response for a general report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReportResponse {
    pub id: String,
    pub informant_id: i64,
    pub complainant_name: String,
    pub complainant_address: String,
    pub complainant_contact_number: String,
    pub date_of_incident: String,
    pub location_of_incident: String,
    pub report_details: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    pub date_filed: String,
    pub updated_at: String,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id.to_string(),
            informant_id: r.informant_id,
            complainant_name: full_name(
                &r.complainant_first_name,
                r.complainant_middle_name.as_deref(),
                &r.complainant_last_name,
                r.complainant_suffix.as_deref(),
            ),
            complainant_address: r.complainant_address,
            complainant_contact_number: r.complainant_contact_number,
            date_of_incident: r.date_of_incident.to_string(),
            location_of_incident: r.location_of_incident,
            report_details: r.report_details,
            status: r.status,
            action_taken: r.action_taken,
            date_filed: r.date_filed.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Request DTO for filing a general report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct FileReportRequest {
    #[serde(default)]
    pub complainant_first_name: String,
    #[serde(default)]
    pub complainant_middle_name: Option<String>,
    #[serde(default)]
    pub complainant_last_name: String,
    #[serde(default)]
    pub complainant_suffix: Option<String>,
    #[serde(default)]
    pub complainant_address: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 20, message = "Contact number must be at most 20 characters"))
    )]
    pub complainant_contact_number: String,
    pub date_of_incident: NaiveDate,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Location of incident is required"))
    )]
    pub location_of_incident: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Report details are required"))
    )]
    pub report_details: String,
}

/// Request DTO for updating a report's handling status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateReportStatusRequest {
    pub status: String,
    #[serde(default)]
    pub action_taken: Option<String>,
}
