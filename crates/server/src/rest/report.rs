use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    AppError, FeatureFlags, FileReportRequest, ReportActionResponse, ReportResponse,
    UpdateReportStatusRequest,
};

use crate::auth::extractors::{AuthRequired, CaseOfficerRequired};
use crate::error_convert::ValidateRequest;
use crate::workflow::reports;

// ---------------------------------------------------------------------------
// POST /api/reports
// ---------------------------------------------------------------------------

/// File a general report.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = FileReportRequest,
    responses(
        (status = 201, description = "Report filed", body = ReportResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn file_report(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Json(body): Json<FileReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), AppError> {
    body.validate_request()?;
    let report = reports::file_report(&pool, auth.actor(), &body).await?;
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

// ---------------------------------------------------------------------------
// GET /api/reports/{id}
// ---------------------------------------------------------------------------

/// Get a report. Informants see their own, staff see all.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report found", body = ReportResponse),
        (status = 403, description = "Not the informant", body = AppError),
        (status = 404, description = "Report not found", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = crate::repo::report::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Report {} not found", id)))?;

    let actor = auth.actor();
    if !actor.is_staff() && report.informant_id != actor.id {
        return Err(AppError::forbidden("You can only view your own reports"));
    }
    Ok(Json(ReportResponse::from(report)))
}

// ---------------------------------------------------------------------------
// POST /api/reports/{id}/status
// ---------------------------------------------------------------------------

/// Update a report's status and the action taken.
#[utoipa::path(
    post,
    path = "/api/reports/{id}/status",
    params(("id" = Uuid, Path, description = "Report UUID")),
    request_body = UpdateReportStatusRequest,
    responses(
        (status = 200, description = "Report updated", body = ReportActionResponse),
        (status = 403, description = "Secretary role or higher required", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
        (status = 422, description = "Unknown status or missing action taken", body = AppError)
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, features, officer, body))]
pub async fn update_report_status(
    State(pool): State<Pool<Postgres>>,
    State(features): State<FeatureFlags>,
    officer: CaseOfficerRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReportStatusRequest>,
) -> Result<Json<ReportActionResponse>, AppError> {
    let outcome = reports::update_status(&pool, &features, officer.actor(), id, &body).await?;
    Ok(Json(outcome.into()))
}
