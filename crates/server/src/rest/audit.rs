use axum::{
    extract::{Query, State},
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, AuditLogParams, AuditLogResponse};

use crate::auth::extractors::AdminRequired;

/// Audit trail, newest first.
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    params(AuditLogParams),
    responses(
        (status = 200, description = "Audit entries", body = Vec<AuditLogResponse>),
        (status = 403, description = "Admin role required", body = AppError)
    ),
    tag = "audit",
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    State(pool): State<Pool<Postgres>>,
    _admin: AdminRequired,
    Query(params): Query<AuditLogParams>,
) -> Result<Json<Vec<AuditLogResponse>>, AppError> {
    let rows = crate::repo::audit::list(&pool, &params).await?;
    Ok(Json(rows.into_iter().map(AuditLogResponse::from).collect()))
}
