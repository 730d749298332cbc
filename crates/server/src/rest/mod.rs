pub mod audit;
pub mod blotter;
pub mod lupon;
pub mod notification;
pub mod report;
pub mod schedule;

use axum::{routing::{get, patch, post}, Router};
use crate::db::AppState;

/// Build the REST API router. Authorization is enforced per handler by the
/// auth extractors; `auth_middleware` must wrap this router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Blotters
        .route("/api/blotters", post(blotter::file_blotter).get(blotter::list_blotters))
        .route("/api/blotters/mine", get(blotter::my_blotters))
        .route("/api/blotters/{blotter_id}", get(blotter::get_blotter).delete(blotter::delete_blotter))
        .route("/api/blotters/{blotter_id}/status", post(blotter::change_status))
        .route("/api/blotters/{blotter_id}/settlement", post(blotter::settle_blotter))
        .route("/api/blotters/{blotter_id}/notify-secretary", post(blotter::notify_secretary))
        .route("/api/blotters/{blotter_id}/schedules", get(blotter::case_schedules))
        .route("/api/blotters/{blotter_id}/logs", get(blotter::case_logs))
        .route("/api/blotters/{blotter_id}/logs/summary", get(blotter::log_summary))
        // Schedules
        .route("/api/schedules/week", get(schedule::week))
        .route("/api/schedules/mine", get(schedule::my_schedules))
        .route("/api/schedules/{id}/outcome", post(schedule::record_outcome))
        // Notifications
        .route("/api/notifications", get(notification::list_notifications))
        .route("/api/notifications/unread-count", get(notification::unread_count))
        .route("/api/notifications/{id}/read", post(notification::mark_read))
        // Reports
        .route("/api/reports", post(report::file_report))
        .route("/api/reports/{id}", get(report::get_report))
        .route("/api/reports/{id}/status", post(report::update_report_status))
        // Lupon roster
        .route("/api/lupon/members", get(lupon::list_members).post(lupon::create_member))
        .route("/api/lupon/members/{id}", patch(lupon::update_member))
        .route("/api/lupon/availability", get(lupon::availability).put(lupon::set_availability))
        // Audit
        .route("/api/audit-logs", get(audit::list_audit_logs))
}
