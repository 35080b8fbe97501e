// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AppConfig, Config, FrontendConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig, StorageConfig, DATABASE_FILE, DEFAULT_SECRET_KEY,
};

/// Default config file (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest precedence first: built-in defaults, the config file
    /// (skipped when absent), `CATALOG_*` environment variables using `__` as
    /// the section separator, then `SECRET_KEY` for the signing key.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CATALOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("app.secret_key", DEFAULT_SECRET_KEY)?
            .set_default("storage.instance_dir", "instance")?
            .set_default("storage.seed_file", "initial_games.json")?
            .set_default("frontend.root", "frontend/build")?
            .set_default("frontend.entry_document", "index.html")?
            .set_default("frontend.index_files", vec!["index.html"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "games-catalog")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_override_option("app.secret_key", std::env::var("SECRET_KEY").ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("does-not-exist/catalog").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.frontend.entry_document, "index.html");
        assert_eq!(cfg.storage.seed_file, "initial_games.json");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_database_path_is_fixed_under_instance_dir() {
        let storage = StorageConfig {
            instance_dir: "var/instance".to_string(),
            seed_file: "seed.json".to_string(),
        };
        assert_eq!(
            storage.database_path(),
            Path::new("var/instance").join(DATABASE_FILE)
        );
    }

    #[test]
    fn test_placeholder_secret_detection() {
        let app = AppConfig {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        };
        assert!(app.uses_placeholder_secret());

        let app = AppConfig {
            secret_key: "9f1c0d".to_string(),
        };
        assert!(!app.uses_placeholder_secret());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does-not-exist/catalog").unwrap();
        cfg.server.host = "0.0.0.0".to_string();
        cfg.server.port = 8081;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8081);

        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
