use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{AppError, NotificationResponse, UnreadCountResponse};

use crate::auth::extractors::AuthRequired;

// ---------------------------------------------------------------------------
// GET /api/notifications
// ---------------------------------------------------------------------------

/// The signed-in user's notifications, newest first.
///
/// Returned entries keep the read flag they had before the call; all of
/// them are marked read afterwards.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = Vec<NotificationResponse>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let rows = crate::repo::notification::list_for_recipient(&pool, auth.0.sub).await?;
    let marked = crate::repo::notification::mark_all_read(&pool, auth.0.sub).await?;
    tracing::debug!(user_id = auth.0.sub, marked, "Notifications marked read");
    Ok(Json(rows.into_iter().map(NotificationResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/notifications/unread-count
// ---------------------------------------------------------------------------

/// Unread badge count.
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn unread_count(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = crate::repo::notification::unread_count(&pool, auth.0.sub).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

// ---------------------------------------------------------------------------
// POST /api/notifications/{id}/read
// ---------------------------------------------------------------------------

/// Mark one of the signed-in user's notifications read.
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification UUID")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Notification not found", body = AppError)
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_read(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if crate::repo::notification::mark_read(&pool, id, auth.0.sub).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Notification {} not found", id)))
    }
}
