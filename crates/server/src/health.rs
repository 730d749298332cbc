use axum::extract::State;
use axum::Json;
use serde::Serialize;
use shared_types::FeatureFlags;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Liveness report for the portal.
///
/// `status` is `degraded` while Postgres is unreachable; the process itself
/// keeps answering.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Barangay this portal instance serves.
    pub barangay: String,
    pub db: String,
    /// Whether case notices are also emailed.
    pub email_delivery: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

fn overall_status(db_ok: bool) -> &'static str {
    if db_ok {
        "ok"
    } else {
        "degraded"
    }
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(pool): State<Pool<Postgres>>,
    State(features): State<FeatureFlags>,
) -> Json<HealthResponse> {
    let ping = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await;
    let db = match &ping {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            format!("error: {e}")
        }
    };

    Json(HealthResponse {
        status: overall_status(ping.is_ok()).to_string(),
        barangay: crate::config::barangay().display_name(),
        db,
        email_delivery: features.mailgun,
        uptime_seconds: START_TIME.get().map_or(0, |t| t.elapsed().as_secs()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
