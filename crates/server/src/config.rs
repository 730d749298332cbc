use shared_types::{AppConfig, BarangayInfo, FeatureFlags};
use std::net::SocketAddr;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Read `config.toml` and store it in the global `OnceLock`. Safe to call
/// multiple times; only the first call has effect.
///
/// A missing or unparseable file falls back to defaults (all integrations off).
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => parse_config(&contents),
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "Config file not found, using defaults");
            AppConfig::default()
        }
    })
}

fn parse_config(contents: &str) -> AppConfig {
    match toml::from_str::<AppConfig>(contents) {
        Ok(config) => {
            tracing::info!(features = ?config.features, barangay = %config.barangay.name, "Loaded config");
            config
        }
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "Failed to parse config, using defaults");
            AppConfig::default()
        }
    }
}

/// Loaded feature flags. All-false if `load_config()` hasn't run.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags { mailgun: false };
    CONFIG.get().map(|c| &c.features).unwrap_or(&DEFAULT)
}

/// Barangay display details, or defaults if `load_config()` hasn't run.
pub fn barangay() -> BarangayInfo {
    CONFIG.get().map(|c| c.barangay.clone()).unwrap_or_default()
}

/// Process-level settings read from the environment.
/// Load `.env` from the working directory, if present. Call before anything
/// reads the environment.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
}

impl ServerSettings {
    /// Read settings from the environment. Only `DATABASE_URL` is required.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|e| format!("Invalid BIND_ADDR {bind:?}: {e}"))?;

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
        })
    }
}
