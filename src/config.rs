use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
// Matches the upstream upload-size policy (16 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration, layered from `config/default.toml`, an
/// environment-specific file and `APP__*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Database connection URL (Postgres in production, SQLite in tests)
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Directory uploads are staged in before ingestion
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Maximum accepted upload body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_upload_dir() -> String {
    DEFAULT_UPLOAD_DIR.to_string()
}
fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}

/// Loads configuration for the current run environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    config.try_deserialize()
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
