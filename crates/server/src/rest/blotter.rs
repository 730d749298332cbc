use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{
    summarize_logs, Actor, AppError, Blotter, BlotterListParams, BlotterListResponse,
    BlotterResponse, BlotterStatus, CaseActionResponse, FeatureFlags, FileBlotterRequest, IncidentLogResponse,
    LogSummary, NotifySecretaryResponse, ScheduleResponse, SettlementRequest, TransitionRequest,
};

use crate::auth::extractors::{AdminRequired, AuthRequired, CaseOfficerRequired, StaffRequired};
use crate::error_convert::ValidateRequest;
use crate::workflow::cases;

pub(crate) async fn load_blotter(pool: &Pool<Postgres>, blotter_id: &str) -> Result<Blotter, AppError> {
    crate::repo::blotter::find_by_blotter_id(pool, blotter_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Blotter {} not found", blotter_id)))
}

/// Complainants see their own cases, staff see every case.
pub(crate) fn ensure_can_view(actor: Actor, blotter: &Blotter) -> Result<(), AppError> {
    if actor.is_staff() || blotter.complainant_id == actor.id {
        Ok(())
    } else {
        Err(AppError::forbidden("You can only view your own blotter cases"))
    }
}

// ---------------------------------------------------------------------------
// POST /api/blotters
// ---------------------------------------------------------------------------

/// File a new blotter case.
#[utoipa::path(
    post,
    path = "/api/blotters",
    request_body = FileBlotterRequest,
    responses(
        (status = 201, description = "Blotter filed", body = BlotterResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Filing for another resident requires staff role", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn file_blotter(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Json(body): Json<FileBlotterRequest>,
) -> Result<(StatusCode, Json<BlotterResponse>), AppError> {
    body.validate_request()?;
    let blotter = cases::file_blotter(&pool, auth.actor(), &body).await?;
    Ok((StatusCode::CREATED, Json(BlotterResponse::from(blotter))))
}

// ---------------------------------------------------------------------------
// GET /api/blotters
// ---------------------------------------------------------------------------

/// List blotter cases, newest first.
#[utoipa::path(
    get,
    path = "/api/blotters",
    params(BlotterListParams),
    responses(
        (status = 200, description = "Blotter page", body = BlotterListResponse),
        (status = 403, description = "Staff role required", body = AppError),
        (status = 422, description = "Unknown status filter", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn list_blotters(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
    Query(params): Query<BlotterListParams>,
) -> Result<Json<BlotterListResponse>, AppError> {
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        if BlotterStatus::from_str_opt(status).is_none() {
            return Err(AppError::invalid_field("status", format!("Unknown status '{}'", status)));
        }
    }

    let (rows, total) = crate::repo::blotter::list(&pool, &params).await?;
    Ok(Json(BlotterListResponse {
        blotters: rows.into_iter().map(BlotterResponse::from).collect(),
        total,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/blotters/mine
// ---------------------------------------------------------------------------

/// Cases filed by the signed-in user.
#[utoipa::path(
    get,
    path = "/api/blotters/mine",
    responses(
        (status = 200, description = "Own cases", body = Vec<BlotterResponse>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn my_blotters(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<BlotterResponse>>, AppError> {
    let rows = crate::repo::blotter::list_by_complainant(&pool, auth.0.sub).await?;
    Ok(Json(rows.into_iter().map(BlotterResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/blotters/{blotter_id}
// ---------------------------------------------------------------------------

/// Get a blotter case by identifier.
#[utoipa::path(
    get,
    path = "/api/blotters/{blotter_id}",
    params(("blotter_id" = String, Path, description = "Blotter identifier, e.g. Brgy.250001")),
    responses(
        (status = 200, description = "Blotter found", body = BlotterResponse),
        (status = 403, description = "Not the complainant", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn get_blotter(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(blotter_id): Path<String>,
) -> Result<Json<BlotterResponse>, AppError> {
    let blotter = load_blotter(&pool, &blotter_id).await?;
    ensure_can_view(auth.actor(), &blotter)?;
    Ok(Json(BlotterResponse::from(blotter)))
}

// ---------------------------------------------------------------------------
// DELETE /api/blotters/{blotter_id}
// ---------------------------------------------------------------------------

/// Delete a blotter case and everything attached to it.
#[utoipa::path(
    delete,
    path = "/api/blotters/{blotter_id}",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    responses(
        (status = 204, description = "Blotter deleted"),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin))]
pub async fn delete_blotter(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    Path(blotter_id): Path<String>,
) -> Result<StatusCode, AppError> {
    cases::delete_blotter(&pool, admin.actor(), &blotter_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/blotters/{blotter_id}/status
// ---------------------------------------------------------------------------

/// Move a case to a new status.
///
/// Hearing statuses book a schedule. Summarize and the closing statuses
/// require remarks and write an incident log entry.
#[utoipa::path(
    post,
    path = "/api/blotters/{blotter_id}/status",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Status changed", body = CaseActionResponse),
        (status = 403, description = "Secretary role or higher required", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError),
        (status = 409, description = "Transition not allowed from the current status", body = AppError),
        (status = 422, description = "Missing remarks or hearing date", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, features, officer, body))]
pub async fn change_status(
    State(pool): State<Pool<Postgres>>,
    State(features): State<FeatureFlags>,
    officer: CaseOfficerRequired,
    Path(blotter_id): Path<String>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<CaseActionResponse>, AppError> {
    let outcome = cases::transition(&pool, &features, officer.actor(), &blotter_id, &body).await?;
    Ok(Json(outcome.into()))
}

// ---------------------------------------------------------------------------
// POST /api/blotters/{blotter_id}/settlement
// ---------------------------------------------------------------------------

/// Record an amicable settlement and certify the case closed.
#[utoipa::path(
    post,
    path = "/api/blotters/{blotter_id}/settlement",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    request_body = SettlementRequest,
    responses(
        (status = 200, description = "Case settled", body = CaseActionResponse),
        (status = 403, description = "Secretary role or higher required", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError),
        (status = 409, description = "Case already closed", body = AppError),
        (status = 422, description = "Missing settlement date or agreement", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, features, officer, body))]
pub async fn settle_blotter(
    State(pool): State<Pool<Postgres>>,
    State(features): State<FeatureFlags>,
    officer: CaseOfficerRequired,
    Path(blotter_id): Path<String>,
    Json(body): Json<SettlementRequest>,
) -> Result<Json<CaseActionResponse>, AppError> {
    let outcome = cases::settle(&pool, &features, officer.actor(), &blotter_id, &body).await?;
    Ok(Json(outcome.into()))
}

// ---------------------------------------------------------------------------
// POST /api/blotters/{blotter_id}/notify-secretary
// ---------------------------------------------------------------------------

/// Flag a case for review by the Barangay Secretary.
#[utoipa::path(
    post,
    path = "/api/blotters/{blotter_id}/notify-secretary",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    responses(
        (status = 200, description = "Secretary notified, or already notified", body = NotifySecretaryResponse),
        (status = 403, description = "Staff role required", body = AppError),
        (status = 404, description = "Blotter or active Secretary not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, features, staff))]
pub async fn notify_secretary(
    State(pool): State<Pool<Postgres>>,
    State(features): State<FeatureFlags>,
    staff: StaffRequired,
    Path(blotter_id): Path<String>,
) -> Result<Json<NotifySecretaryResponse>, AppError> {
    let response = cases::notify_secretary(&pool, &features, staff.actor(), &blotter_id).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// GET /api/blotters/{blotter_id}/schedules
// ---------------------------------------------------------------------------

/// Hearings booked for a case.
#[utoipa::path(
    get,
    path = "/api/blotters/{blotter_id}/schedules",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    responses(
        (status = 200, description = "Case schedules", body = Vec<ScheduleResponse>),
        (status = 403, description = "Not the complainant", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn case_schedules(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(blotter_id): Path<String>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let blotter = load_blotter(&pool, &blotter_id).await?;
    ensure_can_view(auth.actor(), &blotter)?;
    let rows = crate::repo::schedule::list_by_case(&pool, blotter.id).await?;
    Ok(Json(rows.into_iter().map(ScheduleResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/blotters/{blotter_id}/logs
// ---------------------------------------------------------------------------

/// Incident log history for a case, newest first.
#[utoipa::path(
    get,
    path = "/api/blotters/{blotter_id}/logs",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    responses(
        (status = 200, description = "Log entries", body = Vec<IncidentLogResponse>),
        (status = 403, description = "Staff role required", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn case_logs(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
    Path(blotter_id): Path<String>,
) -> Result<Json<Vec<IncidentLogResponse>>, AppError> {
    let blotter = load_blotter(&pool, &blotter_id).await?;
    let rows = crate::repo::incident_log::list_by_case(&pool, blotter.id).await?;
    Ok(Json(rows.into_iter().map(IncidentLogResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/blotters/{blotter_id}/logs/summary
// ---------------------------------------------------------------------------

/// Latest processing and final result for a case.
#[utoipa::path(
    get,
    path = "/api/blotters/{blotter_id}/logs/summary",
    params(("blotter_id" = String, Path, description = "Blotter identifier")),
    responses(
        (status = 200, description = "Log summary", body = LogSummary),
        (status = 403, description = "Staff role required", body = AppError),
        (status = 404, description = "Blotter not found", body = AppError)
    ),
    tag = "blotters",
    security(("bearer_auth" = []))
)]
pub async fn log_summary(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
    Path(blotter_id): Path<String>,
) -> Result<Json<LogSummary>, AppError> {
    let blotter = load_blotter(&pool, &blotter_id).await?;
    let logs = crate::repo::incident_log::list_by_case(&pool, blotter.id).await?;
    Ok(Json(summarize_logs(&blotter.blotter_id, blotter.date_filed, &logs)))
}
