use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

/// Every blotter identifier starts with this prefix, followed by the
/// two-digit filing year and a zero-padded sequence (`Brgy.250001`).
pub const BLOTTER_ID_PREFIX: &str = "Brgy.";

/// Case status of a blotter. Values double as display labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BlotterStatus {
    New,
    Summarize,
    Summon,
    Mediation,
    Conciliation,
    Repudiation,
    Withdraw,
    Dismiss,
    Certified,
}

/// Valid status values matching the DB CHECK constraint.
pub const BLOTTER_STATUSES: &[&str] = &[
    "New",
    "Summarize",
    "Summon",
    "Mediation",
    "Conciliation",
    "Repudiation",
    "Withdraw",
    "Dismiss",
    "Certified",
];

const FROM_NEW: &[BlotterStatus] = &[
    BlotterStatus::Summarize,
    BlotterStatus::Summon,
    BlotterStatus::Mediation,
    BlotterStatus::Conciliation,
    BlotterStatus::Withdraw,
    BlotterStatus::Dismiss,
];

const FROM_SUMMARIZE: &[BlotterStatus] = &[
    BlotterStatus::Summon,
    BlotterStatus::Mediation,
    BlotterStatus::Conciliation,
    BlotterStatus::Withdraw,
    BlotterStatus::Dismiss,
];

const FROM_PROCEEDINGS: &[BlotterStatus] = &[
    BlotterStatus::Summon,
    BlotterStatus::Mediation,
    BlotterStatus::Conciliation,
    BlotterStatus::Repudiation,
    BlotterStatus::Withdraw,
    BlotterStatus::Dismiss,
    BlotterStatus::Certified,
];

impl BlotterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Summarize => "Summarize",
            Self::Summon => "Summon",
            Self::Mediation => "Mediation",
            Self::Conciliation => "Conciliation",
            Self::Repudiation => "Repudiation",
            Self::Withdraw => "Withdraw",
            Self::Dismiss => "Dismiss",
            Self::Certified => "Certified",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Self::New),
            "Summarize" => Some(Self::Summarize),
            "Summon" => Some(Self::Summon),
            "Mediation" => Some(Self::Mediation),
            "Conciliation" => Some(Self::Conciliation),
            "Repudiation" => Some(Self::Repudiation),
            "Withdraw" => Some(Self::Withdraw),
            "Dismiss" => Some(Self::Dismiss),
            "Certified" => Some(Self::Certified),
            _ => None,
        }
    }

    /// Summon, Mediation and Conciliation each open a hearing.
    pub fn is_scheduling(&self) -> bool {
        matches!(self, Self::Summon | Self::Mediation | Self::Conciliation)
    }

    /// Final dispositions. Nothing leaves these states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Repudiation | Self::Withdraw | Self::Dismiss | Self::Certified
        )
    }

    /// Statuses an operator may move a case to from this one.
    pub fn allowed_next(&self) -> &'static [BlotterStatus] {
        match self {
            Self::New => FROM_NEW,
            Self::Summarize => FROM_SUMMARIZE,
            Self::Summon | Self::Mediation | Self::Conciliation => FROM_PROCEEDINGS,
            Self::Repudiation | Self::Withdraw | Self::Dismiss | Self::Certified => &[],
        }
    }

    pub fn can_transition_to(&self, next: BlotterStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl std::fmt::Display for BlotterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of incident reported in a blotter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum IncidentType {
    Theft,
    #[serde(rename = "Physical Injury")]
    PhysicalInjury,
    #[serde(rename = "Oral Defamation")]
    OralDefamation,
    #[serde(rename = "Slander by Deed")]
    SlanderByDeed,
    Threats,
    #[serde(rename = "Malicious Mischief")]
    MaliciousMischief,
    #[serde(rename = "Estafa / Swindling")]
    Estafa,
    Trespassing,
    #[serde(rename = "Unjust Vexation")]
    UnjustVexation,
    #[serde(rename = "Public Scandal")]
    PublicScandal,
    #[serde(rename = "Noise Complaint")]
    NoiseComplaint,
    #[serde(rename = "Boundary Dispute")]
    BoundaryDispute,
    #[serde(rename = "Debt Collection")]
    DebtCollection,
    Others,
}

impl IncidentType {
    pub const ALL: [IncidentType; 14] = [
        Self::Theft,
        Self::PhysicalInjury,
        Self::OralDefamation,
        Self::SlanderByDeed,
        Self::Threats,
        Self::MaliciousMischief,
        Self::Estafa,
        Self::Trespassing,
        Self::UnjustVexation,
        Self::PublicScandal,
        Self::NoiseComplaint,
        Self::BoundaryDispute,
        Self::DebtCollection,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::PhysicalInjury => "Physical Injury",
            Self::OralDefamation => "Oral Defamation",
            Self::SlanderByDeed => "Slander by Deed",
            Self::Threats => "Threats",
            Self::MaliciousMischief => "Malicious Mischief",
            Self::Estafa => "Estafa / Swindling",
            Self::Trespassing => "Trespassing",
            Self::UnjustVexation => "Unjust Vexation",
            Self::PublicScandal => "Public Scandal",
            Self::NoiseComplaint => "Noise Complaint",
            Self::BoundaryDispute => "Boundary Dispute",
            Self::DebtCollection => "Debt Collection",
            Self::Others => "Others",
        }
    }

    /// Bilingual label shown to residents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Theft => "Theft / Pagnanakaw",
            Self::PhysicalInjury => "Physical Injury / Pananakit",
            Self::OralDefamation => "Oral Defamation / Paninirang-puri (Salita)",
            Self::SlanderByDeed => "Slander by Deed / Paninirang-puri (Gawa)",
            Self::Threats => "Threats / Pagbabanta",
            Self::MaliciousMischief => "Malicious Mischief / Paninira ng Ari-arian",
            Self::Estafa => "Estafa / Swindling / Panloloko",
            Self::Trespassing => "Trespassing",
            Self::UnjustVexation => "Unjust Vexation / Pang-aabala",
            Self::PublicScandal => "Public Scandal / Eskandalo sa Publiko",
            Self::NoiseComplaint => "Noise Complaint / Reklamo sa Ingay",
            Self::BoundaryDispute => "Boundary Dispute / Away sa Lupa",
            Self::DebtCollection => "Debt Collection / Paniningil ng Utang",
            Self::Others => "Others / Iba pa",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Label for a stored incident type string, falling back to the raw value.
pub fn incident_type_label(value: &str) -> String {
    IncidentType::from_str_opt(value)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| value.to_string())
}

// ── Identifier sequencing ───────────────────────────────────────────

/// `Brgy.` plus the two-digit year, e.g. `Brgy.25` for 2025.
pub fn blotter_year_prefix(year: i32) -> String {
    format!("{}{:02}", BLOTTER_ID_PREFIX, year.rem_euclid(100))
}

/// Sequence number of `blotter_id` within the year identified by `year_prefix`.
/// Returns `None` when the id belongs to another year or is malformed.
pub fn parse_blotter_sequence(blotter_id: &str, year_prefix: &str) -> Option<u32> {
    let digits = blotter_id.strip_prefix(year_prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next identifier for `year` given the highest identifier already issued
/// that year. The sequence restarts at 0001 each year.
pub fn next_blotter_id(year: i32, latest: Option<&str>) -> String {
    let prefix = blotter_year_prefix(year);
    let next = latest
        .and_then(|id| parse_blotter_sequence(id, &prefix))
        .unwrap_or(0)
        + 1;
    format!("{prefix}{next:04}")
}

/// Join name parts, skipping blank middle names and suffixes.
pub fn full_name(first: &str, middle: Option<&str>, last: &str, suffix: Option<&str>) -> String {
    [Some(first), middle, Some(last), suffix]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Rows and DTOs ───────────────────────────────────────────────────

/// A filed blotter case (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Blotter {
    pub id: Uuid,
    pub blotter_id: String,
    pub complainant_id: i64,
    pub complainant_first_name: String,
    pub complainant_middle_name: Option<String>,
    pub complainant_last_name: String,
    pub complainant_suffix: Option<String>,
    pub complainant_address: String,
    pub complainant_contact_number: String,
    pub incident_type: String,
    pub date_of_incident: NaiveDate,
    pub location_of_incident: String,
    pub incident_description: String,
    pub respondent_first_name: String,
    pub respondent_middle_name: Option<String>,
    pub respondent_last_name: String,
    pub respondent_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// BlotterStatus stored as its display text (e.g. "Mediation").
    pub status: String,
    pub date_filed: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blotter {
    /// Parsed status. Rows are guarded by a CHECK constraint, so an
    /// unknown value only appears if the schema and code disagree.
    pub fn status(&self) -> Option<BlotterStatus> {
        BlotterStatus::from_str_opt(&self.status)
    }

    pub fn complainant_name(&self) -> String {
        full_name(
            &self.complainant_first_name,
            self.complainant_middle_name.as_deref(),
            &self.complainant_last_name,
            self.complainant_suffix.as_deref(),
        )
    }

    pub fn respondent_name(&self) -> String {
        full_name(
            &self.respondent_first_name,
            self.respondent_middle_name.as_deref(),
            &self.respondent_last_name,
            None,
        )
    }
}

/// API response for a blotter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlotterResponse {
    pub id: String,
    pub blotter_id: String,
    pub complainant_id: i64,
    pub complainant_name: String,
    pub complainant_address: String,
    pub complainant_contact_number: String,
    pub incident_type: String,
    pub incident_type_label: String,
    pub date_of_incident: String,
    pub location_of_incident: String,
    pub incident_description: String,
    pub respondent_name: String,
    pub respondent_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub status: String,
    pub date_filed: String,
    pub updated_at: String,
}

impl From<Blotter> for BlotterResponse {
    fn from(b: Blotter) -> Self {
        let complainant_name = b.complainant_name();
        let respondent_name = b.respondent_name();
        let incident_type_label = incident_type_label(&b.incident_type);
        Self {
            id: b.id.to_string(),
            blotter_id: b.blotter_id,
            complainant_id: b.complainant_id,
            complainant_name,
            complainant_address: b.complainant_address,
            complainant_contact_number: b.complainant_contact_number,
            incident_type: b.incident_type,
            incident_type_label,
            date_of_incident: b.date_of_incident.to_string(),
            location_of_incident: b.location_of_incident,
            incident_description: b.incident_description,
            respondent_name,
            respondent_address: b.respondent_address,
            latitude: b.latitude,
            longitude: b.longitude,
            status: b.status,
            date_filed: b.date_filed.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

fn default_incident_type() -> String {
    IncidentType::Others.as_str().to_string()
}

/// Request DTO for filing a blotter.
///
/// Residents file for themselves. Staff filing on-site may set
/// `complainant_id` to the resident's account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct FileBlotterRequest {
    #[serde(default)]
    pub complainant_id: Option<i64>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Complainant first name is required"))
    )]
    pub complainant_first_name: String,
    #[serde(default)]
    pub complainant_middle_name: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Complainant last name is required"))
    )]
    pub complainant_last_name: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 10, message = "Suffix must be at most 10 characters"))
    )]
    pub complainant_suffix: Option<String>,
    #[serde(default)]
    pub complainant_address: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 20, message = "Contact number must be at most 20 characters"))
    )]
    pub complainant_contact_number: String,
    #[serde(default = "default_incident_type")]
    pub incident_type: String,
    pub date_of_incident: NaiveDate,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Location of incident is required"))
    )]
    pub location_of_incident: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Incident description is required"))
    )]
    pub incident_description: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Respondent first name is required"))
    )]
    pub respondent_first_name: String,
    #[serde(default)]
    pub respondent_middle_name: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 100, message = "Respondent last name is required"))
    )]
    pub respondent_last_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Respondent address is required"))
    )]
    pub respondent_address: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))
    )]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))
    )]
    pub longitude: Option<f64>,
}

/// Query parameters for the staff blotter list.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct BlotterListParams {
    pub status: Option<String>,
    /// Matches the blotter id or either party's name.
    pub q: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Paged blotter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlotterListResponse {
    pub blotters: Vec<BlotterResponse>,
    pub total: i64,
}
