//! Configuration management for web service
//!
//! Supports loading configuration from environment variables with fallback to defaults.

use todo_store::DEFAULT_DATABASE_URL;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKER_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Raw `DATABASE_URL`; normalized when the store is opened.
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKER_COUNT,
        }
    }
}

impl ServerConfig {
    /// Load ServerConfig from environment variables
    ///
    /// Environment variables:
    /// - `DATABASE_URL`: Database connection string (default: `sqlite:///todolist.db`)
    /// - `APP_HOST`: Address to bind (default: 127.0.0.1)
    /// - `APP_PORT`: Port to bind (default: 8080)
    /// - `APP_WORKERS`: HTTP worker threads (default: 4)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.database_url),
            host: lookup("APP_HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            workers: lookup("APP_WORKERS")
                .and_then(|v| v.parse().ok())
                .filter(|workers: &usize| *workers > 0)
                .unwrap_or(defaults.workers),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_server_config_has_sensible_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "sqlite:///todolist.db");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.workers > 0);
    }

    #[test]
    fn test_server_config_reads_environment() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@db/todos"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "5000"),
            ("APP_WORKERS", "2"),
        ]);
        assert_eq!(config.database_url, "postgres://u:p@db/todos");
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_server_config_ignores_unparseable_values() {
        let config = config_from(&[
            ("APP_PORT", "eighty"),
            ("APP_WORKERS", "0"),
            ("DATABASE_URL", " "),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.workers, DEFAULT_WORKER_COUNT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }
}
