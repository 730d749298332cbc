use chrono::{Datelike, Utc};
use shared_types::{
    blotter_year_prefix, incident_type_label, next_blotter_id, Actor, AppError, Blotter,
    BlotterStatus, CaseActionResponse, EmailDelivery, FeatureFlags, FileBlotterRequest, IncidentLog,
    IncidentType, Notification, NotifySecretaryResponse, RecordHearingRequest, Schedule,
    SettlementRequest, SettlementResult, TransitionRequest, UserRole, AUDIT_CREATED_BLOTTER,
    AUDIT_DELETED_BLOTTER, AUDIT_UPDATED_BLOTTER, LOG_TYPE_HEARING, LOG_TYPE_SETTLEMENT,
    LOG_TYPE_STATUS_UPDATE,
};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::plan::{self, TransitionEffect};
use super::{begin, commit};
use crate::delivery;
use crate::mailgun;
use crate::repo;
use crate::repo::incident_log::NewIncidentLog;
use crate::repo::notification::NewNotification;

/// Attempts at claiming the next blotter id before giving up.
const MAX_ID_ATTEMPTS: u32 = 3;

/// What a status change or settlement wrote.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub blotter: Blotter,
    pub schedule: Option<Schedule>,
    pub incident_log: Option<IncidentLog>,
    pub notification: Notification,
    pub email: EmailDelivery,
}

impl From<CaseOutcome> for CaseActionResponse {
    fn from(o: CaseOutcome) -> Self {
        Self {
            blotter: o.blotter.into(),
            schedule: o.schedule.map(Into::into),
            incident_log: o.incident_log.map(Into::into),
            notification: o.notification.into(),
            email: o.email,
        }
    }
}

async fn load_case(conn: &mut PgConnection, blotter_id: &str) -> Result<(Blotter, BlotterStatus), AppError> {
    let blotter = repo::blotter::find_by_blotter_id_in(conn, blotter_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Blotter {} not found", blotter_id)))?;
    let status = blotter.status().ok_or_else(|| {
        AppError::internal(format!("Blotter {} has unknown status '{}'", blotter.blotter_id, blotter.status))
    })?;
    Ok((blotter, status))
}

/// File a new case and assign the next identifier for the current year.
///
/// Residents always file for themselves. Staff may name another
/// complainant account. Every active Secretary is told about the case.
pub async fn file_blotter(
    pool: &Pool<Postgres>,
    actor: Actor,
    req: &FileBlotterRequest,
) -> Result<Blotter, AppError> {
    let complainant_id = match req.complainant_id {
        Some(id) if id != actor.id && !actor.is_staff() => {
            return Err(AppError::forbidden("Residents can only file blotters for themselves"));
        }
        Some(id) => id,
        None => actor.id,
    };

    if IncidentType::from_str_opt(&req.incident_type).is_none() {
        return Err(AppError::invalid_field(
            "incident_type",
            format!("Unknown incident type '{}'", req.incident_type),
        ));
    }

    let year = Utc::now().year();
    let prefix = blotter_year_prefix(year);

    let mut attempt = 1;
    loop {
        let mut tx = begin(pool).await?;
        repo::blotter::lock_id_sequence(&mut *tx, &prefix).await?;
        let latest = repo::blotter::latest_id_with_prefix(&mut *tx, &prefix).await?;
        let blotter_id = next_blotter_id(year, latest.as_deref());

        let blotter = match repo::blotter::insert(&mut *tx, &blotter_id, complainant_id, req).await {
            Ok(b) => b,
            Err(e) if e.is_conflict() && attempt < MAX_ID_ATTEMPTS => {
                tracing::warn!(blotter_id = %blotter_id, attempt, "Blotter id already taken, retrying");
                attempt += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        repo::notification::create(
            &mut *tx,
            &NewNotification {
                recipient_id: complainant_id,
                sender_id: Some(actor.id),
                message: plan::filed_message(&blotter.blotter_id),
                blotter_case_id: Some(blotter.id),
                report_id: None,
            },
        )
        .await?;

        let secretaries = repo::user::list_active_by_role(&mut *tx, UserRole::Secretary).await?;
        let complainant_name = blotter.complainant_name();
        for secretary in &secretaries {
            repo::notification::create(
                &mut *tx,
                &NewNotification {
                    recipient_id: secretary.id,
                    sender_id: Some(actor.id),
                    message: plan::new_case_message(&blotter.blotter_id, &complainant_name),
                    blotter_case_id: Some(blotter.id),
                    report_id: None,
                },
            )
            .await?;
        }

        repo::audit::record(
            &mut *tx,
            Some(actor.id),
            AUDIT_CREATED_BLOTTER,
            &format!("Filed blotter {} for complainant {}", blotter.blotter_id, complainant_id),
        )
        .await?;

        commit(tx).await?;

        tracing::info!(
            blotter_id = %blotter.blotter_id,
            complainant_id,
            actor_id = actor.id,
            secretaries = secretaries.len(),
            "Blotter filed"
        );
        return Ok(blotter);
    }
}

/// Move a case to a new status, booking a hearing or logging the change.
pub async fn transition(
    pool: &Pool<Postgres>,
    features: &FeatureFlags,
    actor: Actor,
    blotter_id: &str,
    req: &TransitionRequest,
) -> Result<CaseOutcome, AppError> {
    let mut tx = begin(pool).await?;
    let (blotter, current) = load_case(&mut *tx, blotter_id).await?;
    let plan = plan::plan_transition(current, req)?;

    let updated = repo::blotter::update_status(&mut *tx, blotter.id, plan.to).await?;

    let (schedule, incident_log, message, email) = match &plan.effect {
        TransitionEffect::Schedule {
            schedule_type,
            date,
            time,
            remarks,
        } => {
            let schedule =
                repo::schedule::create(&mut *tx, blotter.id, *schedule_type, *date, *time, actor.id).await?;
            let when = format!(
                "{} at {}",
                plan::format_hearing_date(*date),
                plan::format_hearing_time(*time)
            );
            let email = mailgun::hearing_notice_email(
                &updated.complainant_name(),
                &updated.blotter_id,
                schedule_type.as_str(),
                &when,
                remarks.as_deref(),
            );
            let message = plan::scheduled_message(
                *schedule_type,
                &updated.blotter_id,
                *date,
                *time,
                remarks.as_deref(),
            );
            (Some(schedule), None, message, email)
        }
        TransitionEffect::Log { remarks } => {
            let log = repo::incident_log::create(
                &mut *tx,
                &NewIncidentLog {
                    case_id: blotter.id,
                    case_title: plan::status_log_title(plan.to),
                    log_type: LOG_TYPE_STATUS_UPDATE,
                    status: plan.to.as_str().to_string(),
                    processed_by: actor.id,
                    result: None,
                    remarks: Some(remarks.clone()),
                    amicable_settlement_date: None,
                    agreement_details: None,
                },
            )
            .await?;
            let email = mailgun::status_update_email(
                &updated.complainant_name(),
                &updated.blotter_id,
                plan.to.as_str(),
                Some(remarks),
            );
            (None, Some(log), plan::status_message(&updated.blotter_id, plan.to), email)
        }
    };

    let notification = repo::notification::create(
        &mut *tx,
        &NewNotification {
            recipient_id: updated.complainant_id,
            sender_id: Some(actor.id),
            message,
            blotter_case_id: Some(updated.id),
            report_id: None,
        },
    )
    .await?;

    repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_BLOTTER,
        &format!("{}: {} -> {}", updated.blotter_id, plan.from, plan.to),
    )
    .await?;

    commit(tx).await?;

    tracing::info!(
        blotter_id = %updated.blotter_id,
        from = %plan.from,
        to = %plan.to,
        actor_id = actor.id,
        "Case status changed"
    );

    let email = delivery::email_user(pool, features, updated.complainant_id, &email).await;

    Ok(CaseOutcome {
        blotter: updated,
        schedule,
        incident_log,
        notification,
        email,
    })
}

/// Close a case through amicable settlement.
pub async fn settle(
    pool: &Pool<Postgres>,
    features: &FeatureFlags,
    actor: Actor,
    blotter_id: &str,
    req: &SettlementRequest,
) -> Result<CaseOutcome, AppError> {
    let mut tx = begin(pool).await?;
    let (blotter, current) = load_case(&mut *tx, blotter_id).await?;
    let plan = plan::plan_settlement(current, req)?;

    let updated = repo::blotter::update_status(&mut *tx, blotter.id, BlotterStatus::Certified).await?;

    let log = repo::incident_log::create(
        &mut *tx,
        &NewIncidentLog {
            case_id: blotter.id,
            case_title: plan::SETTLEMENT_TITLE.to_string(),
            log_type: LOG_TYPE_SETTLEMENT,
            status: BlotterStatus::Certified.as_str().to_string(),
            processed_by: actor.id,
            result: Some(SettlementResult::Settled.as_str().to_string()),
            remarks: Some(plan.remarks.clone()),
            amicable_settlement_date: Some(plan.settlement_date),
            agreement_details: Some(plan.agreement_details.clone()),
        },
    )
    .await?;

    let notification = repo::notification::create(
        &mut *tx,
        &NewNotification {
            recipient_id: updated.complainant_id,
            sender_id: Some(actor.id),
            message: plan::settled_message(&updated.blotter_id),
            blotter_case_id: Some(updated.id),
            report_id: None,
        },
    )
    .await?;

    repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_BLOTTER,
        &format!("{}: {} -> Certified (settled)", updated.blotter_id, current),
    )
    .await?;

    commit(tx).await?;

    tracing::info!(blotter_id = %updated.blotter_id, actor_id = actor.id, "Case settled");

    let message = mailgun::settlement_email(
        &updated.complainant_name(),
        &updated.blotter_id,
        &plan::format_hearing_date(plan.settlement_date),
        &plan.agreement_details,
    );
    let email = delivery::email_user(pool, features, updated.complainant_id, &message).await;

    Ok(CaseOutcome {
        blotter: updated,
        schedule: None,
        incident_log: Some(log),
        notification,
        email,
    })
}

/// Log what happened at a scheduled hearing. The case status is unchanged.
pub async fn record_hearing(
    pool: &Pool<Postgres>,
    actor: Actor,
    schedule_id: Uuid,
    req: &RecordHearingRequest,
) -> Result<IncidentLog, AppError> {
    let mut tx = begin(pool).await?;
    let schedule = repo::schedule::find_by_id_in(&mut *tx, schedule_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Schedule {} not found", schedule_id)))?;
    let (blotter, current) = load_case(&mut *tx, &schedule.blotter_id).await?;
    let plan = plan::plan_hearing(current, req)?;

    let log = repo::incident_log::create(
        &mut *tx,
        &NewIncidentLog {
            case_id: blotter.id,
            case_title: plan::hearing_log_title(&schedule.schedule_type),
            log_type: LOG_TYPE_HEARING,
            status: current.as_str().to_string(),
            processed_by: actor.id,
            result: plan.result.map(|r| r.as_str().to_string()),
            remarks: Some(plan.remarks),
            amicable_settlement_date: None,
            agreement_details: None,
        },
    )
    .await?;

    repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_BLOTTER,
        &format!("{}: recorded {} hearing", blotter.blotter_id, schedule.schedule_type),
    )
    .await?;

    commit(tx).await?;

    tracing::info!(
        blotter_id = %blotter.blotter_id,
        schedule_id = %schedule_id,
        result = ?log.result,
        actor_id = actor.id,
        "Hearing recorded"
    );
    Ok(log)
}

/// Ask the Barangay Secretary to review a case.
///
/// Repeat requests from the same sender for the same case are not duplicated.
pub async fn notify_secretary(
    pool: &Pool<Postgres>,
    features: &FeatureFlags,
    actor: Actor,
    blotter_id: &str,
) -> Result<NotifySecretaryResponse, AppError> {
    let mut tx = begin(pool).await?;
    let (blotter, _) = load_case(&mut *tx, blotter_id).await?;

    let secretary = repo::user::list_active_by_role(&mut *tx, UserRole::Secretary)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("No active Secretary account found"))?;

    if repo::notification::review_request_exists(&mut *tx, secretary.id, actor.id, blotter.id).await? {
        tracing::debug!(blotter_id = %blotter.blotter_id, actor_id = actor.id, "Review already requested");
        return Ok(NotifySecretaryResponse {
            secretary_id: secretary.id,
            already_notified: true,
            notification: None,
            email: EmailDelivery::skipped("secretary was already notified"),
        });
    }

    let flagged_by = repo::user::find_by_id_in(&mut *tx, actor.id)
        .await?
        .map(|u| u.full_name())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("user #{}", actor.id));

    let label = incident_type_label(&blotter.incident_type);
    let complainant_name = blotter.complainant_name();
    let notification = repo::notification::create(
        &mut *tx,
        &NewNotification {
            recipient_id: secretary.id,
            sender_id: Some(actor.id),
            message: plan::review_request_message(&blotter.blotter_id, &label, &complainant_name),
            blotter_case_id: Some(blotter.id),
            report_id: None,
        },
    )
    .await?;

    commit(tx).await?;

    tracing::info!(
        blotter_id = %blotter.blotter_id,
        secretary_id = secretary.id,
        actor_id = actor.id,
        "Secretary asked to review case"
    );

    let message = mailgun::secretary_review_email(
        &secretary.full_name(),
        &blotter.blotter_id,
        &label,
        &complainant_name,
        &flagged_by,
    );
    let email = delivery::email(features, &secretary, &message).await;

    Ok(NotifySecretaryResponse {
        secretary_id: secretary.id,
        already_notified: false,
        notification: Some(notification.into()),
        email,
    })
}

/// Remove a case together with its schedules, logs and notifications.
pub async fn delete_blotter(pool: &Pool<Postgres>, actor: Actor, blotter_id: &str) -> Result<(), AppError> {
    let mut tx = begin(pool).await?;
    let (blotter, status) = load_case(&mut *tx, blotter_id).await?;

    repo::blotter::delete(&mut *tx, blotter.id).await?;
    repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_DELETED_BLOTTER,
        &format!("Deleted blotter {} (status {})", blotter.blotter_id, status),
    )
    .await?;

    commit(tx).await?;

    tracing::info!(blotter_id = %blotter.blotter_id, actor_id = actor.id, "Blotter deleted");
    Ok(())
}
