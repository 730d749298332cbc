use server::config::{self, ServerSettings};

#[tokio::main]
async fn main() {
    config::load_env_file();
    server::telemetry::init_tracing();
    config::load_config();
    server::health::record_start_time();

    let settings = match ServerSettings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };

    let pool = server::db::create_pool(&settings)
        .expect("Failed to create database pool");
    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Max request body (default 1 MB), configurable via MAX_BODY_BYTES.
    let max_body: usize = std::env::var("MAX_BODY_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1024 * 1024);

    let router = server::openapi::api_router(pool)
        .layer(axum::extract::DefaultBodyLimit::max(max_body))
        .layer(axum::middleware::from_fn(server::auth::middleware::auth_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
        .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
            tower_http::request_id::MakeRequestUuid,
        ));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(
        addr = %settings.bind_addr,
        barangay = %config::barangay().display_name(),
        mailgun = config::feature_flags().mailgun,
        "Barangay case management server listening"
    );

    axum::serve(listener, router).await.expect("Server error");
}
