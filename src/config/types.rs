// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// File name of the store inside the instance directory
pub const DATABASE_FILE: &str = "games.db";

/// Placeholder secret shipped with the defaults, never meant for production
pub const DEFAULT_SECRET_KEY: &str = "dev";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub frontend: FrontendConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Application secrets
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub secret_key: String,
}

impl AppConfig {
    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Store location and provisioning inputs
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Instance directory holding the store file
    pub instance_dir: String,
    /// Seed dataset consumed by `init-db`
    pub seed_file: String,
}

impl StorageConfig {
    /// Fixed location of the store: `<instance_dir>/games.db`
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.instance_dir).join(DATABASE_FILE)
    }
}

/// Pre-built single-page-application bundle
#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    /// Asset tree root
    pub root: String,
    /// Document served for client-side routes
    pub entry_document: String,
    /// Index files tried when a directory is requested
    pub index_files: Vec<String>,
}

impl FrontendConfig {
    pub fn entry_path(&self) -> PathBuf {
        PathBuf::from(&self.root).join(&self.entry_document)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}
