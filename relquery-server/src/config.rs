//! Gateway configuration
//!
//! Resolution order: built-in defaults, then a TOML file, then whatever
//! the binary layers on top (environment, CLI flags).
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8000"
//! cors_permissive = false
//!
//! [database]
//! url = "sqlite://relquery.db"
//! max_connections = 5
//! seed = true
//!
//! [defaults]
//! owner_id = 11
//! customer_id = 1
//! ```

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RELQUERY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub defaults: QueryDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    /// Load the demo dataset into an empty database on startup
    pub seed: bool,
}

/// Filter values used when a request does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub owner_id: i64,
    pub customer_id: i64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://relquery.db".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            seed: true,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            owner_id: 11,
            customer_id: 1,
        }
    }
}

impl GatewayConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get default config file path: ~/.relquery/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".relquery").join("config.toml"))
    }

    /// Find and load the active config.
    ///
    /// An explicit path or `RELQUERY_CONFIG` must exist; the default
    /// location is optional and built-in defaults apply without it.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = GatewayConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite::memory:"

            [defaults]
            owner_id = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.database.seed);
        assert_eq!(config.defaults.owner_id, 3);
        assert_eq!(config.defaults.customer_id, 1);
        assert_eq!(config.server.bind.port(), 8000);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"0.0.0.0:9090\"\ncors_permissive = true").unwrap();

        let config = GatewayConfig::discover(Some(file.path())).unwrap();
        assert_eq!(config.server.bind.port(), 9090);
        assert!(config.server.cors_permissive);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GatewayConfig::discover(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind = 1").unwrap();
        let err = GatewayConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
