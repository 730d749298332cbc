use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    group_by_day, window_end, work_week, AppError, IncidentLogResponse, RecordHearingRequest, ScheduleDay,
    WeekParams, DEFAULT_WEEK_DAYS, MAX_WEEK_DAYS,
};

use crate::auth::extractors::{AuthRequired, CaseOfficerRequired, StaffRequired};
use crate::workflow::cases;

// ---------------------------------------------------------------------------
// POST /api/schedules/{id}/outcome
// ---------------------------------------------------------------------------

/// Log the outcome of a hearing without changing the case status.
#[utoipa::path(
    post,
    path = "/api/schedules/{id}/outcome",
    params(("id" = Uuid, Path, description = "Schedule UUID")),
    request_body = RecordHearingRequest,
    responses(
        (status = 201, description = "Hearing logged", body = IncidentLogResponse),
        (status = 403, description = "Secretary role or higher required", body = AppError),
        (status = 404, description = "Schedule not found", body = AppError),
        (status = 409, description = "Case already closed", body = AppError),
        (status = 422, description = "Missing remarks or invalid result", body = AppError)
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, officer, body))]
pub async fn record_outcome(
    State(pool): State<Pool<Postgres>>,
    officer: CaseOfficerRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordHearingRequest>,
) -> Result<(StatusCode, Json<IncidentLogResponse>), AppError> {
    let log = cases::record_hearing(&pool, officer.actor(), id, &body).await?;
    Ok((StatusCode::CREATED, Json(IncidentLogResponse::from(log))))
}

// ---------------------------------------------------------------------------
// GET /api/schedules/week
// ---------------------------------------------------------------------------

/// Hearing board grouped by day.
#[utoipa::path(
    get,
    path = "/api/schedules/week",
    params(WeekParams),
    responses(
        (status = 200, description = "Hearings per day", body = Vec<ScheduleDay>),
        (status = 403, description = "Staff role required", body = AppError),
        (status = 422, description = "Invalid day count or start date", body = AppError)
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn week(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
    Query(params): Query<WeekParams>,
) -> Result<Json<Vec<ScheduleDay>>, AppError> {
    let days = params.days.unwrap_or(DEFAULT_WEEK_DAYS);
    if days == 0 || days > MAX_WEEK_DAYS {
        return Err(AppError::invalid_field(
            "days",
            format!("Days must be between 1 and {}", MAX_WEEK_DAYS),
        ));
    }

    let start = params.start.unwrap_or_else(|| Utc::now().date_naive());
    let end = window_end(start, days).ok_or_else(|| {
        AppError::invalid_field("start", "Start date is too far in the future for this window")
    })?;
    let rows = crate::repo::schedule::list_between(&pool, start, end).await?;
    Ok(Json(group_by_day(start, days, rows)))
}

// ---------------------------------------------------------------------------
// GET /api/schedules/mine
// ---------------------------------------------------------------------------

/// The signed-in complainant's hearings for the current Monday to Friday.
#[utoipa::path(
    get,
    path = "/api/schedules/mine",
    responses(
        (status = 200, description = "Own hearings this week", body = Vec<ScheduleDay>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn my_schedules(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<ScheduleDay>>, AppError> {
    let (monday, friday) = work_week(Utc::now().date_naive());
    let rows = crate::repo::schedule::list_for_complainant_between(&pool, auth.0.sub, monday, friday).await?;
    Ok(Json(group_by_day(monday, 5, rows)))
}
