use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome recorded against a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SettlementResult {
    Settled,
    Unsettled,
}

impl SettlementResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settled => "Settled",
            Self::Unsettled => "Unsettled",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "Settled" => Some(Self::Settled),
            "Unsettled" => Some(Self::Unsettled),
            _ => None,
        }
    }
}

/// Log entry categories.
pub const LOG_TYPE_STATUS_UPDATE: &str = "Status Update";
pub const LOG_TYPE_HEARING: &str = "Hearing";
pub const LOG_TYPE_SETTLEMENT: &str = "Settlement";

/// Append-only history entry for a blotter case (DB row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct IncidentLog {
    pub id: Uuid,
    pub case_id: Uuid,
    pub blotter_id: String,
    pub case_title: String,
    pub log_type: String,
    /// Case status at the time of the action.
    pub status: String,
    pub processed_by: Option<i64>,
    pub date_processed: DateTime<Utc>,
    pub result: Option<String>,
    pub remarks: Option<String>,
    pub amicable_settlement_date: Option<NaiveDate>,
    pub agreement_details: Option<String>,
}

/// API response for an incident log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IncidentLogResponse {
    pub id: String,
    pub blotter_id: String,
    pub case_title: String,
    pub log_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<i64>,
    pub date_processed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amicable_settlement_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement_details: Option<String>,
}

impl From<IncidentLog> for IncidentLogResponse {
    fn from(l: IncidentLog) -> Self {
        Self {
            id: l.id.to_string(),
            blotter_id: l.blotter_id,
            case_title: l.case_title,
            log_type: l.log_type,
            status: l.status,
            processed_by: l.processed_by,
            date_processed: l.date_processed.to_rfc3339(),
            result: l.result,
            remarks: l.remarks,
            amicable_settlement_date: l.amicable_settlement_date.map(|d| d.to_string()),
            agreement_details: l.agreement_details,
        }
    }
}

/// Processing summary shown on the case history page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LogSummary {
    pub blotter_id: String,
    pub total_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_processed_by: Option<i64>,
    /// Date of the newest entry, or the filing date when nothing is logged yet.
    pub last_processed_at: String,
    /// Result of the newest entry carrying one, else "Unsettled".
    pub final_result: String,
}

/// Summarize a case's history. `logs` may be in any order.
pub fn summarize_logs(blotter_id: &str, date_filed: DateTime<Utc>, logs: &[IncidentLog]) -> LogSummary {
    let latest = logs.iter().max_by_key(|l| l.date_processed);
    let final_result = logs
        .iter()
        .filter(|l| l.result.is_some())
        .max_by_key(|l| l.date_processed)
        .and_then(|l| l.result.clone())
        .unwrap_or_else(|| SettlementResult::Unsettled.as_str().to_string());

    LogSummary {
        blotter_id: blotter_id.to_string(),
        total_entries: logs.len(),
        last_processed_by: latest.and_then(|l| l.processed_by),
        last_processed_at: latest
            .map(|l| l.date_processed)
            .unwrap_or(date_filed)
            .to_rfc3339(),
        final_result,
    }
}
