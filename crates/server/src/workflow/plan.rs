//! Pure decision logic for case workflow operations.
//!
//! Each `plan_*` function validates a request against the current case
//! state and returns what must be written. Nothing here touches the database.

use chrono::{NaiveDate, NaiveTime};
use shared_types::{
    AppError, BlotterStatus, RecordHearingRequest, ScheduleType, SettlementRequest,
    SettlementResult, TransitionRequest,
};

pub const SETTLEMENT_TITLE: &str = "Amicable Settlement Reached";
pub const SETTLEMENT_REMARKS: &str =
    "The case has been formally settled by both parties and is now certified closed.";

/// Side effect a status change requires besides the status update itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEffect {
    /// Hearing statuses book an appearance.
    Schedule {
        schedule_type: ScheduleType,
        date: NaiveDate,
        time: NaiveTime,
        remarks: Option<String>,
    },
    /// Review and closing statuses snapshot the case into the log.
    Log { remarks: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: BlotterStatus,
    pub to: BlotterStatus,
    pub effect: TransitionEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPlan {
    pub settlement_date: NaiveDate,
    pub agreement_details: String,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HearingPlan {
    pub remarks: String,
    pub result: Option<SettlementResult>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn ensure_open(current: BlotterStatus) -> Result<(), AppError> {
    if current.is_terminal() {
        return Err(AppError::conflict(format!(
            "Case is already closed with status '{}'",
            current
        )));
    }
    Ok(())
}

/// Validate a status change request.
pub fn plan_transition(
    current: BlotterStatus,
    req: &TransitionRequest,
) -> Result<TransitionPlan, AppError> {
    let to = BlotterStatus::from_str_opt(req.status.trim()).ok_or_else(|| {
        AppError::invalid_field("status", format!("Unknown status '{}'", req.status))
    })?;

    if !current.can_transition_to(to) {
        return Err(AppError::conflict(format!(
            "Cannot change status from '{}' to '{}'",
            current, to
        )));
    }

    let remarks = non_blank(req.remarks.as_deref());

    let effect = match ScheduleType::for_status(to) {
        Some(schedule_type) => {
            let date = req.appearance_date.ok_or_else(|| {
                AppError::invalid_field("appearance_date", "Appearance date is required to schedule a hearing.")
            })?;
            let time = req.appearance_time.ok_or_else(|| {
                AppError::invalid_field("appearance_time", "Appearance time is required to schedule a hearing.")
            })?;
            TransitionEffect::Schedule {
                schedule_type,
                date,
                time,
                remarks,
            }
        }
        None => TransitionEffect::Log {
            remarks: remarks.ok_or_else(|| {
                AppError::invalid_field("remarks", "Remarks are required for this action.")
            })?,
        },
    };

    Ok(TransitionPlan {
        from: current,
        to,
        effect,
    })
}

/// Validate an amicable settlement. Settled cases always end `Certified`.
pub fn plan_settlement(
    current: BlotterStatus,
    req: &SettlementRequest,
) -> Result<SettlementPlan, AppError> {
    ensure_open(current)?;

    let settlement_date = req.settlement_date.ok_or_else(|| {
        AppError::invalid_field("settlement_date", "Settlement date is required.")
    })?;
    let agreement_details = non_blank(req.agreement_details.as_deref()).ok_or_else(|| {
        AppError::invalid_field("agreement_details", "Agreement details are required.")
    })?;

    Ok(SettlementPlan {
        settlement_date,
        agreement_details,
        remarks: non_blank(req.remarks.as_deref()).unwrap_or_else(|| SETTLEMENT_REMARKS.to_string()),
    })
}

/// Validate a hearing outcome entry.
pub fn plan_hearing(current: BlotterStatus, req: &RecordHearingRequest) -> Result<HearingPlan, AppError> {
    ensure_open(current)?;

    let remarks = non_blank(req.remarks.as_deref()).ok_or_else(|| {
        AppError::invalid_field("remarks", "Remarks are required for this action.")
    })?;

    let result = match non_blank(req.result.as_deref()) {
        Some(r) => Some(SettlementResult::from_str_opt(&r).ok_or_else(|| {
            AppError::invalid_field("result", "Result must be 'Settled' or 'Unsettled'.")
        })?),
        None => None,
    };

    Ok(HearingPlan { remarks, result })
}

// --- Notification messages ---

pub fn filed_message(blotter_id: &str) -> String {
    format!(
        "Your blotter case (ID: {}) has been successfully filed and is awaiting review.",
        blotter_id
    )
}

pub fn new_case_message(blotter_id: &str, complainant_name: &str) -> String {
    format!("New Blotter Case Filed: {} by {}.", blotter_id, complainant_name)
}

/// Notice for a newly booked hearing; officer remarks are appended when given.
pub fn scheduled_message(
    schedule_type: ScheduleType,
    blotter_id: &str,
    date: NaiveDate,
    time: NaiveTime,
    remarks: Option<&str>,
) -> String {
    let notice = format!(
        "A '{}' has been scheduled for your case {} on {} at {}.",
        schedule_type.as_str(),
        blotter_id,
        format_hearing_date(date),
        format_hearing_time(time)
    );
    match remarks {
        Some(r) => format!("{notice} Remarks: {r}"),
        None => notice,
    }
}

pub fn status_message(blotter_id: &str, status: BlotterStatus) -> String {
    format!(
        "An update on your case {}: The status is now '{}'.",
        blotter_id, status
    )
}

pub fn status_log_title(status: BlotterStatus) -> String {
    format!("Status changed to {}", status)
}

pub fn settled_message(blotter_id: &str) -> String {
    format!(
        "Your case {} has been amicably settled and is now certified closed.",
        blotter_id
    )
}

pub fn hearing_log_title(schedule_type: &str) -> String {
    format!("{} Hearing", schedule_type)
}

pub fn review_request_message(blotter_id: &str, incident_label: &str, complainant_name: &str) -> String {
    format!(
        "Blotter Case {} ({}) needs review by the Secretary. Submitted by {}.",
        blotter_id, incident_label, complainant_name
    )
}

pub fn report_filed_message(report_id: &str) -> String {
    format!(
        "Your general report (ID: {}) has been successfully submitted.",
        report_id
    )
}

pub fn report_status_message(excerpt: &str, status: &str) -> String {
    format!(
        "The status of your report ('{}') has been updated to '{}'.",
        excerpt, status
    )
}

/// `March 14, 2025`
pub fn format_hearing_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `09:30 AM`
pub fn format_hearing_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}
