//! Server configuration.
//!
//! Loaded from environment variables (after an optional `.env` file) with
//! fallback to defaults. Malformed values fail startup instead of being
//! silently replaced.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use stockroom_core::DEFAULT_MAX_UPLOAD_BYTES;
use stockroom_db::{DbConfig, MySqlConfig, SqliteConfig};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port (default: 5000)
    pub port: u16,

    /// Store selection and connection settings
    pub database: DbConfig,

    /// Directory holding uploaded images (default: ./uploads)
    pub upload_dir: PathBuf,

    /// Upload size cap in bytes (default: 5 MB)
    pub max_file_size: usize,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let use_mysql = parse_flag(&var, "USE_MYSQL")?;

        let database = if use_mysql {
            let defaults = MySqlConfig::default();
            DbConfig::MySql(MySqlConfig {
                host: var("DB_HOST").unwrap_or(defaults.host.clone()),
                user: var("DB_USER").unwrap_or(defaults.user.clone()),
                password: var("DB_PASSWORD").unwrap_or(defaults.password.clone()),
                database: var("DB_NAME").unwrap_or(defaults.database.clone()),
                port: parse_or(&var, "DB_PORT", defaults.port)?,
                ..defaults
            })
        } else {
            let path = var("SQLITE_PATH").unwrap_or_else(|| "./inventory.db".to_string());
            DbConfig::Sqlite(SqliteConfig::new(path))
        };

        Ok(ServerConfig {
            port: parse_or(&var, "PORT", 5000)?,
            database,
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            max_file_size: parse_or(&var, "MAX_FILE_SIZE", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Listens on all interfaces.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
    }
}

fn parse_flag(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<bool, ConfigError> {
    let Some(raw) = var(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.max_file_size, 5_000_000);
        match config.database {
            DbConfig::Sqlite(sqlite) => assert_eq!(sqlite.path, PathBuf::from("./inventory.db")),
            other => panic!("expected SQLite, got {other:?}"),
        }
    }

    #[test]
    fn test_mysql_selection() {
        let config = load(&[
            ("USE_MYSQL", "true"),
            ("DB_HOST", "db.local"),
            ("DB_PASSWORD", "secret"),
            ("DB_PORT", "3307"),
        ])
        .unwrap();

        match config.database {
            DbConfig::MySql(mysql) => {
                assert_eq!(mysql.host, "db.local");
                assert_eq!(mysql.user, "root");
                assert_eq!(mysql.password, "secret");
                assert_eq!(mysql.database, "inventory_manager");
                assert_eq!(mysql.port, 3307);
            }
            other => panic!("expected MySQL, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            load(&[("PORT", "fivethousand")]),
            Err(ConfigError::InvalidValue { name, .. }) if name == "PORT"
        ));
        assert!(load(&[("MAX_FILE_SIZE", "-1")]).is_err());
        assert!(load(&[("USE_MYSQL", "yes please")]).is_err());
        assert!(load(&[("USE_MYSQL", "false"), ("PORT", "8080")]).is_ok());
    }
}
