use shared_types::{AppError, AuditLog, AuditLogParams};
use sqlx::{PgConnection, Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Append an audit entry. `actor_id` is `None` for system actions.
pub async fn record(
    conn: &mut PgConnection,
    actor_id: Option<i64>,
    action: &str,
    details: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO audit_logs (actor_id, action, details) VALUES ($1, $2, $3)")
        .bind(actor_id)
        .bind(action)
        .bind(details)
        .execute(conn)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    tracing::debug!(actor_id = ?actor_id, action, details, "Audit entry recorded");
    Ok(())
}

/// Newest entries first, optionally for one actor. Limit defaults to 100, max 500.
pub async fn list(pool: &Pool<Postgres>, params: &AuditLogParams) -> Result<Vec<AuditLog>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, actor_id, action, details, created_at
        FROM audit_logs
        WHERE ($1::BIGINT IS NULL OR actor_id = $1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(params.actor_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
