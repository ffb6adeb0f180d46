//! Configuration module for environment variables and application settings

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;
/// 100 KiB, the usual cap for JSON request bodies.
pub const DEFAULT_JSON_BODY_LIMIT: usize = 100 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listener configuration
    pub server: ServerConfig,

    /// Database configuration, `None` when `DATABASE_URL` is unset
    pub database: Option<DatabaseSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub json_body_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset. A value that is present but does not
    /// parse is an error rather than a silent fallback to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let server = ServerConfig {
            host: parse_or("HOST", var("HOST"), DEFAULT_HOST)?,
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            json_body_limit: parse_or(
                "JSON_BODY_LIMIT",
                var("JSON_BODY_LIMIT"),
                DEFAULT_JSON_BODY_LIMIT,
            )?,
        };

        let database = match var("DATABASE_URL") {
            Some(url) => Some(DatabaseSettings {
                url,
                max_connections: non_zero(
                    "DATABASE_MAX_CONNECTIONS",
                    parse_or(
                        "DATABASE_MAX_CONNECTIONS",
                        var("DATABASE_MAX_CONNECTIONS"),
                        DEFAULT_MAX_CONNECTIONS,
                    )?,
                )?,
            }),
            None => None,
        };

        Ok(Self { server, database })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: name,
            reason: e.to_string(),
            value,
        }),
    }
}

/// A pool of size zero could never hand out a connection.
fn non_zero(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            var: name,
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:4000");
        assert_eq!(config.server.json_body_limit, 102_400);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_port_from_environment() {
        let config = config_from(&[("PORT", "9090")]).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_empty_port_falls_back_to_default() {
        let config = config_from(&[("PORT", "")]).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "abc")]).unwrap_err();
        let ConfigError::InvalidValue { var, value, .. } = err;
        assert_eq!(var, "PORT");
        assert_eq!(value, "abc");

        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_database_settings() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://app:secret@db:5432/erp"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();

        let db = config.database.unwrap();
        assert_eq!(db.url, "postgres://app:secret@db:5432/erp");
        assert_eq!(db.max_connections, 4);
    }

    #[test]
    fn test_zero_max_connections_is_rejected() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://app:secret@db:5432/erp"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ])
        .unwrap_err();

        let ConfigError::InvalidValue { var, value, .. } = err;
        assert_eq!(var, "DATABASE_MAX_CONNECTIONS");
        assert_eq!(value, "0");
    }

    #[test]
    fn test_custom_host() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
