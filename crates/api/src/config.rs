//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! config file, then `DASHBOARD_*` environment variables. Nested keys use a
//! double underscore, e.g. `DASHBOARD_RATE_LIMIT__BURST_SIZE=10`.

use config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::rate_limit::RateLimitConfig;

/// Environment variable naming the config file (without extension)
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "dashboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum tracing level (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    /// Per-IP rate limiting; disabled when absent
    pub rate_limit: Option<RateLimitConfig>,
    pub validation: ValidationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            session_ttl_secs: storage::DEFAULT_SESSION_TTL.as_secs(),
            rate_limit: None,
            validation: ValidationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the file named by `DASHBOARD_CONFIG` (default `dashboard.*`) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file (which may be missing) and the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Get bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.session_ttl(), Duration::from_secs(86_400));
        assert!(config.rate_limit.is_none());
        assert_eq!(config.validation.max_category_len, 255);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ServerConfig::load_from("does-not-exist/dashboard").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_overrides() {
        let toml = r#"
            port = 9090
            log_json = true

            [rate_limit]
            per_second = 1
            burst_size = 20

            [validation]
            value_range = [0, 1000]
        "#;

        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9090);
        assert!(config.log_json);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.rate_limit.unwrap().burst_size, 20);
        assert_eq!(config.validation.value_range, Some((0, 1000)));
        assert_eq!(config.validation.max_category_len, 255);
    }
}
