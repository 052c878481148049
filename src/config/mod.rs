use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL; only optional when running against the memory store
    pub database_url: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    /// Budget for a single matching, search or utilization call
    pub query_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> anyhow::Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("DATABASE_URL is not set".to_string()))
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: default_host(),
            port: default_port(),
            cors_origin: None,
            db_max_connections: default_max_connections(),
            query_timeout_secs: None,
        }
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> anyhow::Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let vars = vec![("DATABASE_URL".to_string(), "postgres://localhost/skills".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/skills");
        assert!(config.query_timeout().is_none());
    }

    #[test]
    fn missing_database_url_is_reported() {
        let config = Config::default();
        assert!(matches!(config.database_url(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn parses_overrides() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("HOST".to_string(), "127.0.0.1".to_string()),
            ("QUERY_TIMEOUT_SECS".to_string(), "3".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(3)));
    }
}
