use shared_types::{AppError, CreateLuponMemberRequest, LuponAvailability, LuponMember, SetAvailabilityRequest};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

pub async fn create_member(
    conn: &mut PgConnection,
    req: &CreateLuponMemberRequest,
) -> Result<LuponMember, AppError> {
    let row = sqlx::query_as::<_, LuponMember>(
        r#"
        INSERT INTO lupon_members (full_name, position, is_active)
        VALUES ($1, $2, $3)
        RETURNING id, full_name, position, is_active, created_at
        "#,
    )
    .bind(req.full_name.trim())
    .bind(req.position.trim())
    .bind(req.is_active)
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Flip a member's active flag. `None` when no such member exists.
pub async fn set_member_active(
    conn: &mut PgConnection,
    id: Uuid,
    is_active: bool,
) -> Result<Option<LuponMember>, AppError> {
    let row = sqlx::query_as::<_, LuponMember>(
        r#"
        UPDATE lupon_members SET is_active = $2
        WHERE id = $1
        RETURNING id, full_name, position, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(is_active)
    .fetch_optional(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Every member, active or not, by name.
pub async fn list_members(pool: &Pool<Postgres>) -> Result<Vec<LuponMember>, AppError> {
    let rows = sqlx::query_as::<_, LuponMember>(
        "SELECT id, full_name, position, is_active, created_at FROM lupon_members ORDER BY full_name",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn list_availability(pool: &Pool<Postgres>) -> Result<Vec<LuponAvailability>, AppError> {
    let rows = sqlx::query_as::<_, LuponAvailability>(
        "SELECT member_id, day_of_week, is_available FROM lupon_availability",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Insert or overwrite one (member, day) cell. An unknown member fails the FK check.
pub async fn upsert_availability(
    conn: &mut PgConnection,
    req: &SetAvailabilityRequest,
) -> Result<LuponAvailability, AppError> {
    let row = sqlx::query_as::<_, LuponAvailability>(
        r#"
        INSERT INTO lupon_availability (member_id, day_of_week, is_available)
        VALUES ($1, $2, $3)
        ON CONFLICT (member_id, day_of_week)
        DO UPDATE SET is_available = EXCLUDED.is_available
        RETURNING member_id, day_of_week, is_available
        "#,
    )
    .bind(req.member_id)
    .bind(req.day_of_week)
    .bind(req.is_available)
    .fetch_one(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}
