use chrono::NaiveDate;
use shared_types::{AppError, IncidentLog};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Fields of a new log entry. `status` is the case status being recorded.
#[derive(Debug, Clone)]
pub struct NewIncidentLog {
    pub case_id: Uuid,
    pub case_title: String,
    pub log_type: &'static str,
    pub status: String,
    pub processed_by: i64,
    pub result: Option<String>,
    pub remarks: Option<String>,
    pub amicable_settlement_date: Option<NaiveDate>,
    pub agreement_details: Option<String>,
}

pub async fn create(conn: &mut PgConnection, entry: &NewIncidentLog) -> Result<IncidentLog, AppError> {
    let row = sqlx::query_as::<_, IncidentLog>(
        r#"
        WITH inserted AS (
            INSERT INTO incident_logs (
                case_id, case_title, log_type, status, processed_by,
                result, remarks, amicable_settlement_date, agreement_details
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        )
        SELECT i.id, i.case_id, b.blotter_id, i.case_title, i.log_type, i.status,
               i.processed_by, i.date_processed, i.result, i.remarks,
               i.amicable_settlement_date, i.agreement_details
        FROM inserted i
        JOIN blotters b ON b.id = i.case_id
        "#,
    )
    .bind(entry.case_id)
    .bind(&entry.case_title)
    .bind(entry.log_type)
    .bind(&entry.status)
    .bind(entry.processed_by)
    .bind(entry.result.as_deref())
    .bind(entry.remarks.as_deref())
    .bind(entry.amicable_settlement_date)
    .bind(entry.agreement_details.as_deref())
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Log entries for a case, newest first.
pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<IncidentLog>, AppError> {
    let rows = sqlx::query_as::<_, IncidentLog>(
        r#"
        SELECT l.id, l.case_id, b.blotter_id, l.case_title, l.log_type, l.status,
               l.processed_by, l.date_processed, l.result, l.remarks,
               l.amicable_settlement_date, l.agreement_details
        FROM incident_logs l
        JOIN blotters b ON b.id = l.case_id
        WHERE l.case_id = $1
        ORDER BY l.date_processed DESC
        "#,
    )
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}
