/**
 * Server Configuration
 *
 * This module loads and validates the server configuration.
 *
 * # Configuration Sources
 *
 * Later sources override earlier ones:
 *
 * 1. Built-in defaults (port 5001, in-memory store)
 * 2. An optional TOML file named by `POETREE_CONFIG`
 * 3. Environment variables: `PORT`, `BIND_ADDRESS`, `DATABASE_URL`,
 *    `STATIC_DIR`, `MAX_TREE_DEPTH`, `RUST_LOG`
 *
 * A `.env` file is folded into the environment by the binary before any of
 * this runs.
 *
 * # Store Selection
 *
 * `DATABASE_URL` unset means the in-memory store; nothing survives a
 * restart. A `sqlite:` URL selects the SQLite store, with
 * `sqlite://default` resolving to the platform data directory.
 */

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::backend::forest::DEFAULT_MAX_DEPTH;
use crate::backend::store::SqliteStore;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable naming the optional TOML config file
pub const CONFIG_PATH_VAR: &str = "POETREE_CONFIG";

/// Alias for the SQLite file in the platform data directory
const DEFAULT_SQLITE_URL: &str = "sqlite://default";

/// Source label for TOML handed to `from_sources` directly
const INLINE_SOURCE: &str = "<inline>";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unsupported database URL: {0}")]
    UnsupportedDatabase(String),
    #[error("cannot read config file {}: {message}", .path.display())]
    File { path: PathBuf, message: String },
}

/// Where the forest and the drafts are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Sqlite(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_address: String,
    pub database_url: Option<String>,
    /// Directory served under `/static`, if any
    pub static_dir: Option<PathBuf>,
    pub max_tree_depth: usize,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: None,
            static_dir: None,
            max_tree_depth: DEFAULT_MAX_DEPTH,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Shape of the TOML config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    bind_address: Option<String>,
    database_url: Option<String>,
    static_dir: Option<PathBuf>,
    max_tree_depth: Option<usize>,
    log_filter: Option<String>,
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load from the process environment and the optional config file
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let path = Path::new(&path);
                Some(parse_file(path, &read_file(path)?)?)
            }
            Err(_) => None,
        };
        Self::layered(file, |key| std::env::var(key).ok())
    }

    /// Layer defaults, TOML text and an environment lookup
    pub fn from_sources<F>(toml_text: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = toml_text
            .map(|text| parse_file(Path::new(INLINE_SOURCE), text))
            .transpose()?;
        Self::layered(file, env)
    }

    fn layered<F>(file: Option<FileConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(file) = file {
            builder = builder.merge_file(file);
        }

        if let Some(port) = env("PORT") {
            builder = builder.port(parse_var("PORT", &port)?);
        }
        if let Some(addr) = env("BIND_ADDRESS") {
            builder = builder.bind_address(addr);
        }
        if let Some(url) = env("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        if let Some(dir) = env("STATIC_DIR") {
            builder = builder.static_dir(dir);
        }
        if let Some(depth) = env("MAX_TREE_DEPTH") {
            builder = builder.max_tree_depth(parse_var("MAX_TREE_DEPTH", &depth)?);
        }
        if let Some(filter) = env("RUST_LOG") {
            builder = builder.log_filter(filter);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_address",
                value: self.bind_address.clone(),
            })?;
        if self.max_tree_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_tree_depth",
                value: "0".to_string(),
            });
        }
        self.store_location()?;
        Ok(())
    }

    /// Socket address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_address",
                value: self.bind_address.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Resolve `database_url` to a concrete store
    pub fn store_location(&self) -> Result<StoreLocation, ConfigError> {
        match self.database_url.as_deref() {
            None => Ok(StoreLocation::Memory),
            Some(DEFAULT_SQLITE_URL) => {
                let path = SqliteStore::default_db_path();
                Ok(StoreLocation::Sqlite(format!("sqlite://{}", path.display())))
            }
            Some(url) if url.starts_with("sqlite:") => Ok(StoreLocation::Sqlite(url.to_string())),
            Some(url) => Err(ConfigError::UnsupportedDatabase(url.to_string())),
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::File {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_file(path: &Path, text: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::File {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    port: Option<u16>,
    bind_address: Option<String>,
    database_url: Option<String>,
    static_dir: Option<PathBuf>,
    max_tree_depth: Option<usize>,
    log_filter: Option<String>,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn bind_address(mut self, addr: impl Into<String>) -> Self {
        self.bind_address = Some(addr.into());
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = Some(depth);
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    fn merge_file(mut self, file: FileConfig) -> Self {
        self.port = file.port.or(self.port);
        self.bind_address = file.bind_address.or(self.bind_address);
        self.database_url = file.database_url.or(self.database_url);
        self.static_dir = file.static_dir.or(self.static_dir);
        self.max_tree_depth = file.max_tree_depth.or(self.max_tree_depth);
        self.log_filter = file.log_filter.or(self.log_filter);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            port: self.port.unwrap_or(defaults.port),
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            database_url: self.database_url,
            static_dir: self.static_dir,
            max_tree_depth: self.max_tree_depth.unwrap_or(defaults.max_tree_depth),
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }
}
