use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    build_matrix, is_valid_workday, AppError, AvailabilityMatrix, CreateLuponMemberRequest,
    LuponAvailability, LuponMemberResponse, SetAvailabilityRequest, UpdateLuponMemberRequest,
    AUDIT_UPDATED_LUPON, WORKDAYS,
};

use crate::auth::extractors::{AdminRequired, StaffRequired};
use crate::error_convert::ValidateRequest;
use crate::workflow::{begin, commit};

// ---------------------------------------------------------------------------
// GET /api/lupon/members
// ---------------------------------------------------------------------------

/// Every Lupon member, active or not.
#[utoipa::path(
    get,
    path = "/api/lupon/members",
    responses(
        (status = 200, description = "Members", body = Vec<LuponMemberResponse>),
        (status = 403, description = "Staff role required", body = AppError)
    ),
    tag = "lupon",
    security(("bearer_auth" = []))
)]
pub async fn list_members(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
) -> Result<Json<Vec<LuponMemberResponse>>, AppError> {
    let rows = crate::repo::lupon::list_members(&pool).await?;
    Ok(Json(rows.into_iter().map(LuponMemberResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// POST /api/lupon/members
// ---------------------------------------------------------------------------

/// Add a member to the Lupon roster.
#[utoipa::path(
    post,
    path = "/api/lupon/members",
    request_body = CreateLuponMemberRequest,
    responses(
        (status = 201, description = "Member added", body = LuponMemberResponse),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "lupon",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin, body))]
pub async fn create_member(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    Json(body): Json<CreateLuponMemberRequest>,
) -> Result<(StatusCode, Json<LuponMemberResponse>), AppError> {
    body.validate_request()?;
    let actor = admin.actor();

    let mut tx = begin(&pool).await?;
    let member = crate::repo::lupon::create_member(&mut *tx, &body).await?;
    crate::repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_LUPON,
        &format!("Added member {} ({})", member.full_name, member.position),
    )
    .await?;
    commit(tx).await?;

    tracing::info!(member_id = %member.id, actor_id = actor.id, "Lupon member added");
    Ok((StatusCode::CREATED, Json(LuponMemberResponse::from(member))))
}

// ---------------------------------------------------------------------------
// PATCH /api/lupon/members/{id}
// ---------------------------------------------------------------------------

/// Deactivate or reactivate a member. Inactive members drop out of the
/// availability roster but keep their stored cells.
#[utoipa::path(
    patch,
    path = "/api/lupon/members/{id}",
    params(("id" = Uuid, Path, description = "Member UUID")),
    request_body = UpdateLuponMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = LuponMemberResponse),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 404, description = "Member not found", body = AppError)
    ),
    tag = "lupon",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin, body))]
pub async fn update_member(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLuponMemberRequest>,
) -> Result<Json<LuponMemberResponse>, AppError> {
    let actor = admin.actor();

    let mut tx = begin(&pool).await?;
    let member = crate::repo::lupon::set_member_active(&mut *tx, id, body.is_active)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Lupon member {} not found", id)))?;
    crate::repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_LUPON,
        &format!(
            "{} member {}",
            if member.is_active { "Reactivated" } else { "Deactivated" },
            member.full_name
        ),
    )
    .await?;
    commit(tx).await?;

    tracing::info!(member_id = %member.id, is_active = member.is_active, actor_id = actor.id, "Lupon member updated");
    Ok(Json(LuponMemberResponse::from(member)))
}

// ---------------------------------------------------------------------------
// GET /api/lupon/availability
// ---------------------------------------------------------------------------

/// Weekly availability of active members, Monday through Friday.
#[utoipa::path(
    get,
    path = "/api/lupon/availability",
    responses(
        (status = 200, description = "Availability matrix", body = AvailabilityMatrix),
        (status = 403, description = "Staff role required", body = AppError)
    ),
    tag = "lupon",
    security(("bearer_auth" = []))
)]
pub async fn availability(
    State(pool): State<Pool<Postgres>>,
    _staff: StaffRequired,
) -> Result<Json<AvailabilityMatrix>, AppError> {
    let members = crate::repo::lupon::list_members(&pool).await?;
    let cells = crate::repo::lupon::list_availability(&pool).await?;
    Ok(Json(build_matrix(&members, &cells)))
}

// ---------------------------------------------------------------------------
// PUT /api/lupon/availability
// ---------------------------------------------------------------------------

/// Set one member's availability for one weekday.
#[utoipa::path(
    put,
    path = "/api/lupon/availability",
    request_body = SetAvailabilityRequest,
    responses(
        (status = 200, description = "Cell saved", body = LuponAvailability),
        (status = 400, description = "Unknown member", body = AppError),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 422, description = "Day out of range", body = AppError)
    ),
    tag = "lupon",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin))]
pub async fn set_availability(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    Json(body): Json<SetAvailabilityRequest>,
) -> Result<Json<LuponAvailability>, AppError> {
    if !is_valid_workday(body.day_of_week) {
        return Err(AppError::invalid_field(
            "day_of_week",
            "Day of week must be 0 (Monday) through 4 (Friday)",
        ));
    }
    let actor = admin.actor();

    let mut tx = begin(&pool).await?;
    let cell = crate::repo::lupon::upsert_availability(&mut *tx, &body).await?;
    crate::repo::audit::record(
        &mut *tx,
        Some(actor.id),
        AUDIT_UPDATED_LUPON,
        &format!(
            "Member {} {} on {}",
            cell.member_id,
            if cell.is_available { "available" } else { "unavailable" },
            WORKDAYS[usize::try_from(cell.day_of_week).unwrap_or_default()]
        ),
    )
    .await?;
    commit(tx).await?;

    Ok(Json(cell))
}
