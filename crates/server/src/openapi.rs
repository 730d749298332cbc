use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AuditLogResponse, AvailabilityMatrix, AvailabilityRow,
    BlotterListResponse, BlotterResponse, BlotterStatus, CaseActionResponse,
    CreateLuponMemberRequest, EmailDelivery, FeatureFlags, FileBlotterRequest, FileReportRequest,
    IncidentLogResponse, IncidentType, LogSummary, LuponAvailability, LuponMemberResponse,
    NotificationResponse, NotifySecretaryResponse, RecordHearingRequest, ReportActionResponse,
    ReportResponse, ReportStatus, ScheduleDay, ScheduleResponse, ScheduleType,
    SetAvailabilityRequest, SettlementRequest, SettlementResult, TransitionRequest,
    UnreadCountResponse, UpdateLuponMemberRequest, UpdateReportStatusRequest,
};
use sqlx::{Pool, Postgres};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Barangay Case Management API"),
    paths(
        // Blotters
        rest::blotter::file_blotter,
        rest::blotter::list_blotters,
        rest::blotter::my_blotters,
        rest::blotter::get_blotter,
        rest::blotter::delete_blotter,
        rest::blotter::change_status,
        rest::blotter::settle_blotter,
        rest::blotter::notify_secretary,
        rest::blotter::case_schedules,
        rest::blotter::case_logs,
        rest::blotter::log_summary,
        // Schedules
        rest::schedule::record_outcome,
        rest::schedule::week,
        rest::schedule::my_schedules,
        // Notifications
        rest::notification::list_notifications,
        rest::notification::unread_count,
        rest::notification::mark_read,
        // Reports
        rest::report::file_report,
        rest::report::get_report,
        rest::report::update_report_status,
        // Lupon
        rest::lupon::list_members,
        rest::lupon::create_member,
        rest::lupon::update_member,
        rest::lupon::availability,
        rest::lupon::set_availability,
        // Audit
        rest::audit::list_audit_logs,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        // Blotter schemas
        BlotterResponse, BlotterListResponse, BlotterStatus, IncidentType, FileBlotterRequest,
        TransitionRequest, SettlementRequest, RecordHearingRequest,
        CaseActionResponse, NotifySecretaryResponse,
        // Schedule and log schemas
        ScheduleResponse, ScheduleType, ScheduleDay,
        IncidentLogResponse, SettlementResult, LogSummary,
        // Notification schemas
        NotificationResponse, UnreadCountResponse, EmailDelivery,
        // Report schemas
        ReportResponse, ReportStatus, FileReportRequest, UpdateReportStatusRequest,
        ReportActionResponse,
        // Lupon schemas
        LuponMemberResponse, CreateLuponMemberRequest, UpdateLuponMemberRequest, LuponAvailability,
        SetAvailabilityRequest, AvailabilityMatrix, AvailabilityRow,
        AuditLogResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "blotters", description = "Blotter filing and case workflow"),
        (name = "schedules", description = "Hearing schedules and outcomes"),
        (name = "notifications", description = "In-portal notifications"),
        (name = "reports", description = "General (non-case) reports"),
        (name = "lupon", description = "Lupon roster and weekly availability"),
        (name = "audit", description = "Audit trail"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Build the full application router: REST API, health check and Scalar docs at `/docs`.
///
/// Integrations follow the loaded `config.toml`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    api_router_with_features(pool, crate::config::feature_flags().clone())
}

/// Same as [`api_router`] with explicit feature flags.
pub fn api_router_with_features(pool: Pool<Postgres>, features: FeatureFlags) -> Router {
    let state = AppState { pool, features };

    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
