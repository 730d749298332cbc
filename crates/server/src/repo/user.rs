use shared_types::{AppError, User, UserRole};
use sqlx::{PgConnection, Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Find a user by id.
pub async fn find_by_id(pool: &Pool<Postgres>, user_id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, role, is_active, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Same as [`find_by_id`], inside an open transaction.
pub async fn find_by_id_in(conn: &mut PgConnection, user_id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, role, is_active, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Active users holding `role`, oldest account first.
pub async fn list_active_by_role(
    conn: &mut PgConnection,
    role: UserRole,
) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, role, is_active, created_at
        FROM users
        WHERE role = $1 AND is_active
        ORDER BY id
        "#,
    )
    .bind(role.as_str())
    .fetch_all(conn)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
