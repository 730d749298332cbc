use chrono::{NaiveDate, NaiveTime};
use shared_types::{AppError, Schedule, ScheduleType};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Create a hearing schedule for a case.
pub async fn create(
    conn: &mut PgConnection,
    case_id: Uuid,
    schedule_type: ScheduleType,
    appearance_date: NaiveDate,
    appearance_time: NaiveTime,
    created_by: i64,
) -> Result<Schedule, AppError> {
    let row = sqlx::query_as::<_, Schedule>(
        r#"
        WITH inserted AS (
            INSERT INTO schedules (case_id, schedule_type, appearance_date, appearance_time, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        )
        SELECT i.id, i.case_id, b.blotter_id, i.schedule_type, i.appearance_date,
               i.appearance_time, i.created_by, i.date_created
        FROM inserted i
        JOIN blotters b ON b.id = i.case_id
        "#,
    )
    .bind(case_id)
    .bind(schedule_type.as_str())
    .bind(appearance_date)
    .bind(appearance_time)
    .bind(created_by)
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Schedule>, AppError> {
    let row = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT s.id, s.case_id, b.blotter_id, s.schedule_type, s.appearance_date,
               s.appearance_time, s.created_by, s.date_created
        FROM schedules s
        JOIN blotters b ON b.id = s.case_id
        WHERE s.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// All schedules of one case in hearing order.
pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<Schedule>, AppError> {
    let rows = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT s.id, s.case_id, b.blotter_id, s.schedule_type, s.appearance_date,
               s.appearance_time, s.created_by, s.date_created
        FROM schedules s
        JOIN blotters b ON b.id = s.case_id
        WHERE s.case_id = $1
        ORDER BY s.appearance_date, s.appearance_time
        "#,
    )
    .bind(case_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Schedules whose appearance date falls in `[start, end]`.
pub async fn list_between(
    pool: &Pool<Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Schedule>, AppError> {
    let rows = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT s.id, s.case_id, b.blotter_id, s.schedule_type, s.appearance_date,
               s.appearance_time, s.created_by, s.date_created
        FROM schedules s
        JOIN blotters b ON b.id = s.case_id
        WHERE s.appearance_date BETWEEN $1 AND $2
        ORDER BY s.appearance_date, s.appearance_time
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Like [`list_between`] but limited to cases filed by `complainant_id`.
pub async fn list_for_complainant_between(
    pool: &Pool<Postgres>,
    complainant_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Schedule>, AppError> {
    let rows = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT s.id, s.case_id, b.blotter_id, s.schedule_type, s.appearance_date,
               s.appearance_time, s.created_by, s.date_created
        FROM schedules s
        JOIN blotters b ON b.id = s.case_id
        WHERE b.complainant_id = $1
          AND s.appearance_date BETWEEN $2 AND $3
        ORDER BY s.appearance_date, s.appearance_time
        "#,
    )
    .bind(complainant_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}
