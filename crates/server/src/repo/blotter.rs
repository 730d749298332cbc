use shared_types::{AppError, Blotter, BlotterListParams, BlotterStatus, FileBlotterRequest};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Serialize id allocation for `prefix` until the surrounding transaction ends.
pub async fn lock_id_sequence(conn: &mut PgConnection, prefix: &str) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(prefix)
        .execute(conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Highest blotter id starting with `prefix`, comparing sequences numerically.
pub async fn latest_id_with_prefix(
    conn: &mut PgConnection,
    prefix: &str,
) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT blotter_id
        FROM blotters
        WHERE blotter_id LIKE $1 || '%'
        ORDER BY LENGTH(blotter_id) DESC, blotter_id DESC
        LIMIT 1
        "#,
    )
    .bind(prefix)
    .fetch_optional(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.map(|(id,)| id))
}

/// Insert a new case in status `New`.
pub async fn insert(
    conn: &mut PgConnection,
    blotter_id: &str,
    complainant_id: i64,
    req: &FileBlotterRequest,
) -> Result<Blotter, AppError> {
    let row = sqlx::query_as::<_, Blotter>(
        r#"
        INSERT INTO blotters (
            blotter_id, complainant_id,
            complainant_first_name, complainant_middle_name, complainant_last_name,
            complainant_suffix, complainant_address, complainant_contact_number,
            incident_type, date_of_incident, location_of_incident, incident_description,
            respondent_first_name, respondent_middle_name, respondent_last_name,
            respondent_address, latitude, longitude, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#,
    )
    .bind(blotter_id)
    .bind(complainant_id)
    .bind(req.complainant_first_name.trim())
    .bind(req.complainant_middle_name.as_deref())
    .bind(req.complainant_last_name.trim())
    .bind(req.complainant_suffix.as_deref())
    .bind(&req.complainant_address)
    .bind(&req.complainant_contact_number)
    .bind(&req.incident_type)
    .bind(req.date_of_incident)
    .bind(&req.location_of_incident)
    .bind(&req.incident_description)
    .bind(req.respondent_first_name.trim())
    .bind(req.respondent_middle_name.as_deref())
    .bind(req.respondent_last_name.trim())
    .bind(&req.respondent_address)
    .bind(req.latitude)
    .bind(req.longitude)
    .bind(BlotterStatus::New.as_str())
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a case by its public identifier (e.g. `Brgy.250001`).
pub async fn find_by_blotter_id(
    pool: &Pool<Postgres>,
    blotter_id: &str,
) -> Result<Option<Blotter>, AppError> {
    let row = sqlx::query_as::<_, Blotter>("SELECT * FROM blotters WHERE blotter_id = $1")
        .bind(blotter_id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Same as [`find_by_blotter_id`], inside an open transaction.
pub async fn find_by_blotter_id_in(
    conn: &mut PgConnection,
    blotter_id: &str,
) -> Result<Option<Blotter>, AppError> {
    let row = sqlx::query_as::<_, Blotter>("SELECT * FROM blotters WHERE blotter_id = $1")
        .bind(blotter_id)
        .fetch_optional(conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Blotter>, AppError> {
    let row = sqlx::query_as::<_, Blotter>("SELECT * FROM blotters WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Set the status and bump `updated_at`.
pub async fn update_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: BlotterStatus,
) -> Result<Blotter, AppError> {
    let row = sqlx::query_as::<_, Blotter>(
        r#"
        UPDATE blotters
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Staff list, newest first, with optional status and text filters.
pub async fn list(
    pool: &Pool<Postgres>,
    params: &BlotterListParams,
) -> Result<(Vec<Blotter>, i64), AppError> {
    let offset = params.offset.unwrap_or(0).max(0);
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let status = params.status.as_deref().filter(|s| !s.is_empty());
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s));

    let filter = r#"
        WHERE ($1::TEXT IS NULL OR status = $1)
          AND ($2::TEXT IS NULL
               OR blotter_id ILIKE $2
               OR complainant_first_name ILIKE $2
               OR complainant_last_name ILIKE $2
               OR respondent_first_name ILIKE $2
               OR respondent_last_name ILIKE $2)
    "#;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM blotters {}", filter))
        .bind(status)
        .bind(q.as_deref())
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    let rows = sqlx::query_as::<_, Blotter>(&format!(
        "SELECT * FROM blotters {} ORDER BY date_filed DESC OFFSET $3 LIMIT $4",
        filter
    ))
    .bind(status)
    .bind(q.as_deref())
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}

/// Cases filed by (or on behalf of) one complainant, newest first.
pub async fn list_by_complainant(
    pool: &Pool<Postgres>,
    complainant_id: i64,
) -> Result<Vec<Blotter>, AppError> {
    let rows = sqlx::query_as::<_, Blotter>(
        "SELECT * FROM blotters WHERE complainant_id = $1 ORDER BY date_filed DESC",
    )
    .bind(complainant_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Delete a case; schedules and logs cascade. Returns true if a row was removed.
pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM blotters WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
