use shared_types::{AppError, FileReportRequest, Report, ReportStatus};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Insert a general report in status `New`.
pub async fn insert(
    conn: &mut PgConnection,
    informant_id: i64,
    req: &FileReportRequest,
) -> Result<Report, AppError> {
    let row = sqlx::query_as::<_, Report>(
        r#"
        INSERT INTO reports (
            informant_id, complainant_first_name, complainant_middle_name,
            complainant_last_name, complainant_suffix, complainant_address,
            complainant_contact_number, date_of_incident, location_of_incident,
            report_details, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(informant_id)
    .bind(req.complainant_first_name.trim())
    .bind(req.complainant_middle_name.as_deref())
    .bind(req.complainant_last_name.trim())
    .bind(req.complainant_suffix.as_deref())
    .bind(&req.complainant_address)
    .bind(&req.complainant_contact_number)
    .bind(req.date_of_incident)
    .bind(&req.location_of_incident)
    .bind(&req.report_details)
    .bind(ReportStatus::New.as_str())
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Report>, AppError> {
    let row = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Set status and action taken. Returns `None` if the report does not exist.
pub async fn update_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: ReportStatus,
    action_taken: &str,
) -> Result<Option<Report>, AppError> {
    let row = sqlx::query_as::<_, Report>(
        r#"
        UPDATE reports
        SET status = $2, action_taken = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(action_taken)
    .fetch_optional(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}
