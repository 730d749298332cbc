use std::time::Duration;

use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use shared_types::FeatureFlags;
use sqlx::{Pool, Postgres};

use crate::config::ServerSettings;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// State shared by every handler. Handlers extract `State<Pool<Postgres>>`
/// or `State<FeatureFlags>` through `FromRef`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub features: FeatureFlags,
}

/// Build the portal's pool. No connection is opened until the first query,
/// so start-up succeeds even while Postgres is still booting.
pub fn create_pool(settings: &ServerSettings) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(&settings.database_url)
}

/// Apply the SQL files under `migrations/`.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
