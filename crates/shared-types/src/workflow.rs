use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::blotter::BlotterResponse;
use crate::incident_log::IncidentLogResponse;
use crate::notification::{EmailDelivery, NotificationResponse};
use crate::schedule::ScheduleResponse;

/// Request DTO for moving a case to a new status.
///
/// Hearing statuses (Summon, Mediation, Conciliation) need the appearance
/// date and time. Summarize and the final dispositions need remarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TransitionRequest {
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub appearance_date: Option<NaiveDate>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "09:30:00"))]
    pub appearance_time: Option<NaiveTime>,
}

/// Request DTO for closing a case through amicable settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SettlementRequest {
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default)]
    pub agreement_details: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Request DTO for logging what happened at a hearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordHearingRequest {
    #[serde(default)]
    pub remarks: Option<String>,
    /// "Settled" or "Unsettled".
    #[serde(default)]
    pub result: Option<String>,
}

/// Everything a status change or settlement wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseActionResponse {
    pub blotter: BlotterResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_log: Option<IncidentLogResponse>,
    pub notification: NotificationResponse,
    pub email: EmailDelivery,
}

/// Result of flagging a case for the Secretary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotifySecretaryResponse {
    pub secretary_id: i64,
    /// True when this sender had already flagged the case; nothing new was sent.
    pub already_notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationResponse>,
    pub email: EmailDelivery,
}

/// Result of a report status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReportActionResponse {
    pub report: crate::report::ReportResponse,
    pub notification: NotificationResponse,
    pub email: EmailDelivery,
}
