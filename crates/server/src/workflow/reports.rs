use shared_types::{
    full_name, Actor, AppError, EmailDelivery, FeatureFlags, FileReportRequest, Notification, Report,
    ReportActionResponse, ReportStatus, UpdateReportStatusRequest, AUDIT_UPDATED_REPORT,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::plan;
use super::{begin, commit};
use crate::delivery;
use crate::mailgun;
use crate::repo;
use crate::repo::notification::NewNotification;

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: Report,
    pub notification: Notification,
    pub email: EmailDelivery,
}

impl From<ReportOutcome> for ReportActionResponse {
    fn from(o: ReportOutcome) -> Self {
        Self {
            report: o.report.into(),
            notification: o.notification.into(),
            email: o.email,
        }
    }
}

/// File a general (non-case) report for the acting user.
pub async fn file_report(
    pool: &Pool<Postgres>,
    actor: Actor,
    req: &FileReportRequest,
) -> Result<Report, AppError> {
    let mut tx = begin(pool).await?;
    let report = repo::report::insert(&mut *tx, actor.id, req).await?;

    repo::notification::create(
        &mut *tx,
        &NewNotification {
            recipient_id: actor.id,
            sender_id: Some(actor.id),
            message: plan::report_filed_message(&report.id.to_string()),
            blotter_case_id: None,
            report_id: Some(report.id),
        },
    )
    .await?;

    commit(tx).await?;

    tracing::info!(report_id = %report.id, informant_id = actor.id, "Report filed");
    Ok(report)
}

/// Change a report's status and record the action taken.
pub async fn update_status(
    pool: &Pool<Postgres>,
    features: &FeatureFlags,
    actor: Actor,
    report_id: Uuid,
    req: &UpdateReportStatusRequest,
) -> Result<ReportOutcome, AppError> {
    let status = ReportStatus::from_str_opt(req.status.trim()).ok_or_else(|| {
        AppError::invalid_field("status", format!("Unknown report status '{}'", req.status))
    })?;
    let action_taken = req
        .action_taken
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::invalid_field("action_taken", "Action taken is required."))?;

    let mut tx = begin(pool).await?;
    let report = repo::report::update_status(&mut *tx, report_id, status, action_taken)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Report {} not found", report_id)))?;

    let notification = repo::notification::create(
        &mut *tx,
        &NewNotification {
            recipient_id: report.informant_id,
            sender_id: Some(actor.id),
            message: plan::report_status_message(&report.excerpt(), status.as_str()),
            blotter_case_id: None,
            report_id: Some(report.id),
        },
    )
    .await?;

    repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_REPORT,
        &format!("Report {} set to {}", report.id, status.as_str()),
    )
    .await?;

    commit(tx).await?;

    tracing::info!(report_id = %report.id, status = status.as_str(), actor_id = actor.id, "Report status changed");

    let name = full_name(
        &report.complainant_first_name,
        report.complainant_middle_name.as_deref(),
        &report.complainant_last_name,
        report.complainant_suffix.as_deref(),
    );
    let message = mailgun::report_update_email(&name, status.as_str(), action_taken);
    let email = delivery::email_user(pool, features, report.informant_id, &message).await;

    Ok(ReportOutcome {
        report,
        notification,
        email,
    })
}
