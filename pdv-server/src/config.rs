//! PDV server configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// PDV server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Max pooled database connections
    pub db_max_connections: u32,
    pub log_format: LogFormat,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
    /// Allowed CORS origin; any origin when unset
    pub cors_allow_origin: Option<String>,
    /// Run a reconciliation pass over every active restaurant at startup
    pub reconcile_on_startup: bool,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| var(name).filter(|s| !s.trim().is_empty());

        let log_format = match non_empty("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            http_port: parse_or("HTTP_PORT", non_empty("HTTP_PORT"), 8080)?,
            environment: non_empty("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", non_empty("DB_MAX_CONNECTIONS"), 10)?,
            log_format,
            log_dir: non_empty("LOG_DIR"),
            cors_allow_origin: non_empty("CORS_ALLOW_ORIGIN"),
            reconcile_on_startup: non_empty("RECONCILE_ON_STARTUP")
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                non_empty("REQUEST_TIMEOUT_SECS"),
                30,
            )?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/pdv")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.log_dir.is_none());
        assert!(config.cors_allow_origin.is_none());
        assert!(!config.reconcile_on_startup);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.is_production());
    }

    #[test]
    fn database_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let err = load(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/pdv"),
            ("HTTP_PORT", "9000"),
            ("ENVIRONMENT", "production"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("LOG_FORMAT", "json"),
            ("LOG_DIR", "/var/log/pdv"),
            ("CORS_ALLOW_ORIGIN", "https://pdv.example.com"),
            ("RECONCILE_ON_STARTUP", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert!(config.is_production());
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/pdv"));
        assert!(config.reconcile_on_startup);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = load(&[("DATABASE_URL", "postgres://db"), ("HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_PORT", .. }));

        let err = load(&[("DATABASE_URL", "postgres://db"), ("LOG_FORMAT", "xml")]).unwrap_err();
        assert_eq!(err.to_string(), "LOG_FORMAT has an invalid value: xml");
    }
}
