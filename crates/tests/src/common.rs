use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    Router,
};
use serde_json::Value;
use shared_types::{FeatureFlags, UserRole};
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

/// Global mutex ensuring tests run sequentially against the shared database.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub const RESIDENT_ID: i64 = 1;
pub const TANOD_ID: i64 = 2;
pub const SECRETARY_ID: i64 = 3;
pub const OFFICIAL_ID: i64 = 4;
pub const ADMIN_ID: i64 = 5;
pub const OTHER_RESIDENT_ID: i64 = 6;

/// Build the full router backed by a real Postgres pool.
///
/// Acquires the global lock, truncates every table and seeds one user per
/// role. Returns `None` when no test database is configured so callers can
/// skip. The guard must be held for the whole test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    test_app_with_features(FeatureFlags::default()).await
}

/// [`test_app`] with explicit integration flags.
pub async fn test_app_with_features(
    features: FeatureFlags,
) -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = TEST_MUTEX.lock().await;
    server::telemetry::init_test_tracing();

    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "barangay-test-secret");
    }

    let Ok(database_url) = std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) else {
        eprintln!("TEST_DATABASE_URL or DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE audit_logs, lupon_availability, lupon_members, notifications, incident_logs, schedules, reports, blotters, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to truncate");

    sqlx::query(
        r#"
        INSERT INTO users (id, email, first_name, last_name, role) VALUES
            (1, 'juan@brgy.test', 'Juan', 'Dela Cruz', 'resident'),
            (2, 'pedro@brgy.test', 'Pedro', 'Santos', 'tanod'),
            (3, 'maria@brgy.test', 'Maria', 'Reyes', 'secretary'),
            (4, 'jose@brgy.test', 'Jose', 'Garcia', 'official'),
            (5, 'admin@brgy.test', 'Ana', 'Lim', 'admin'),
            (6, 'rosa@brgy.test', 'Rosa', 'Bautista', 'resident')
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to seed users");

    let router = server::openapi::api_router_with_features(pool.clone(), features)
        .layer(middleware::from_fn(server::auth::middleware::auth_middleware));

    Some((router, pool, guard))
}

/// JWT for one of the seeded users.
pub fn token_for(user_id: i64) -> String {
    let (email, role) = match user_id {
        TANOD_ID => ("pedro@brgy.test", UserRole::Tanod),
        SECRETARY_ID => ("maria@brgy.test", UserRole::Secretary),
        OFFICIAL_ID => ("jose@brgy.test", UserRole::Official),
        ADMIN_ID => ("admin@brgy.test", UserRole::Admin),
        OTHER_RESIDENT_ID => ("rosa@brgy.test", UserRole::Resident),
        _ => ("juan@brgy.test", UserRole::Resident),
    };
    server::auth::jwt::create_access_token(user_id, email, role).expect("Failed to create test JWT")
}

/// Insert a case directly, bypassing id generation.
pub async fn seed_blotter(pool: &Pool<Postgres>, blotter_id: &str, complainant_id: i64, status: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO blotters (
            blotter_id, complainant_id, complainant_first_name, complainant_last_name,
            incident_type, date_of_incident, location_of_incident, incident_description,
            respondent_first_name, respondent_last_name, respondent_address, status
        )
        VALUES ($1, $2, 'Juan', 'Dela Cruz', 'Noise Complaint', '2025-03-01', 'Purok 3',
                'Loud karaoke past midnight', 'Carlos', 'Mendoza', 'Purok 3', $3)
        RETURNING id
        "#,
    )
    .bind(blotter_id)
    .bind(complainant_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to seed blotter");
    id
}

/// Run a `SELECT COUNT(*) ...` query.
pub async fn count(pool: &Pool<Postgres>, sql: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    n
}

/// A valid blotter filing body.
pub fn blotter_body() -> Value {
    serde_json::json!({
        "complainant_first_name": "Juan",
        "complainant_last_name": "Dela Cruz",
        "complainant_address": "Purok 3, Barangay San Isidro",
        "complainant_contact_number": "09171234567",
        "incident_type": "Theft",
        "date_of_incident": "2025-03-01",
        "location_of_incident": "Sari-sari store, Purok 3",
        "incident_description": "Cellphone taken from the counter",
        "respondent_first_name": "Carlos",
        "respondent_last_name": "Mendoza",
        "respondent_address": "Purok 4"
    })
}

pub async fn post_json(app: &Router, uri: &str, body: &Value, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    send(app, req).await
}

pub async fn put_json(app: &Router, uri: &str, body: &Value, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn patch_json(app: &Router, uri: &str, body: &Value, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let req = builder.body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}
