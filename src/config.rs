// Process configuration, read from the environment.
//
//   BANK_DATABASE_PATH   SQLite file (":memory:" for a throwaway database)
//   BANK_BIND_ADDRESS    address the HTTP server listens on
//   BANK_LOG_LEVEL       error | warn | info | debug | trace

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::level_filters::LevelFilter;

use crate::logging::parse_log_level;

pub const DEFAULT_DATABASE_PATH: &str = "accounts.db";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    /// Raw BANK_BIND_ADDRESS; only the server parses it (`socket_addr`)
    pub bind_address: String,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a closure over a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("BANK_DATABASE_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let bind_address = lookup("BANK_BIND_ADDRESS")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let log_level = parse_log_level(
            &lookup("BANK_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        );

        Ok(Config {
            database_path,
            bind_address,
            log_level,
        })
    }

    /// Parsed listen address. The CLI never calls this, so a bad
    /// BANK_BIND_ADDRESS only stops the server.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid BANK_BIND_ADDRESS: {}", self.bind_address))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_level: LevelFilter::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BANK_DATABASE_PATH", ":memory:"),
            ("BANK_BIND_ADDRESS", "127.0.0.1:3000"),
            ("BANK_LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert_eq!(config.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn test_default_bind_address_parses() {
        let addr = Config::default().socket_addr().unwrap();

        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn test_invalid_bind_address_only_fails_when_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("BANK_DATABASE_PATH", "cli.db"),
            ("BANK_BIND_ADDRESS", "not-an-address"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, "cli.db");
        assert_eq!(config.log_level, LevelFilter::INFO);

        let err = config.socket_addr().unwrap_err();
        assert!(err.to_string().contains("BANK_BIND_ADDRESS"));
    }
}
