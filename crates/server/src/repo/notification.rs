use shared_types::{AppError, Notification};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Marker present in every secretary review request message.
pub const REVIEW_REQUEST_MARKER: &str = "needs review by the Secretary";

#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub sender_id: Option<i64>,
    pub message: String,
    pub blotter_case_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
}

pub async fn create(conn: &mut PgConnection, new: &NewNotification) -> Result<Notification, AppError> {
    let row = sqlx::query_as::<_, Notification>(
        r#"
        WITH inserted AS (
            INSERT INTO notifications (recipient_id, sender_id, message, blotter_case_id, report_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        )
        SELECT i.id, i.recipient_id, i.sender_id, i.message, i.blotter_case_id,
               b.blotter_id, i.report_id, i.is_read, i.created_at
        FROM inserted i
        LEFT JOIN blotters b ON b.id = i.blotter_case_id
        "#,
    )
    .bind(new.recipient_id)
    .bind(new.sender_id)
    .bind(&new.message)
    .bind(new.blotter_case_id)
    .bind(new.report_id)
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// A user's notifications, newest first.
pub async fn list_for_recipient(
    pool: &Pool<Postgres>,
    recipient_id: i64,
) -> Result<Vec<Notification>, AppError> {
    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT n.id, n.recipient_id, n.sender_id, n.message, n.blotter_case_id,
               b.blotter_id, n.report_id, n.is_read, n.created_at
        FROM notifications n
        LEFT JOIN blotters b ON b.id = n.blotter_case_id
        WHERE n.recipient_id = $1
        ORDER BY n.created_at DESC
        "#,
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn mark_all_read(pool: &Pool<Postgres>, recipient_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read")
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected())
}

/// Mark one notification read. Returns false if it does not belong to `recipient_id`.
pub async fn mark_read(pool: &Pool<Postgres>, id: Uuid, recipient_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2")
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

pub async fn unread_count(pool: &Pool<Postgres>, recipient_id: i64) -> Result<i64, AppError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read")
            .bind(recipient_id)
            .fetch_one(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

    Ok(count)
}

/// Whether `sender_id` already asked `recipient_id` to review this case.
pub async fn review_request_exists(
    conn: &mut PgConnection,
    recipient_id: i64,
    sender_id: i64,
    blotter_case_id: Uuid,
) -> Result<bool, AppError> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM notifications
            WHERE recipient_id = $1
              AND sender_id = $2
              AND blotter_case_id = $3
              AND message LIKE '%' || $4 || '%'
        )
        "#,
    )
    .bind(recipient_id)
    .bind(sender_id)
    .bind(blotter_case_id)
    .bind(REVIEW_REQUEST_MARKER)
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(exists)
}
