use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use edgevault_kv::{ConnectOptions, Transport};
use edgevault_store::StoreError;
use serde::Deserialize;
use thiserror::Error;

/// Default Redis port.
pub const REDIS_PORT: u16 = 6379;
/// Default MongoDB port.
pub const MONGODB_PORT: u16 = 27017;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable holds a value of the wrong shape.
    #[error("invalid value '{value}' for {var}")]
    InvalidVar {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },
    /// A configuration document failed to parse.
    #[error("invalid configuration document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Storage settings, one flat section per service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Backend kind, see [`BackendKind`].
    pub backend: String,
    /// Server host.
    pub host: String,
    /// Server port; the backend's usual port when unset.
    pub port: Option<u16>,
    /// Database name; for Redis, the numeric database index.
    pub database: String,
    /// User name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Socket timeout in milliseconds; zero disables it.
    pub socket_timeout_ms: u64,
    /// Unix socket to reach Redis through instead of TCP.
    pub socket_path: Option<PathBuf>,
    /// Runs the index engine over an in-process keyspace named after
    /// `database`.
    pub embedded: bool,
    /// Idle Redis connections kept for reuse.
    pub max_idle: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "redisdb".to_string(),
            host: "localhost".to_string(),
            port: None,
            database: String::new(),
            username: None,
            password: None,
            connect_timeout_ms: 5000,
            socket_timeout_ms: 5000,
            socket_path: None,
            embedded: false,
            max_idle: 1,
        }
    }
}

impl StoreConfig {
    /// Reads `EDGEVAULT_*` variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_prefix("EDGEVAULT")
    }

    /// Reads `<prefix>_*` variables over the defaults.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_vars(prefix, |name| std::env::var(name).ok())
    }

    /// Parses a JSON configuration document; missing keys keep defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Applies `<prefix>_*` values from `lookup` over the defaults.
    pub fn from_vars(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |suffix: &str| {
            let name = format!("{prefix}_{suffix}");
            lookup(&name).map(|value| (name, value))
        };
        let mut config = Self::default();

        if let Some((_, value)) = var("BACKEND") {
            config.backend = value;
        }
        if let Some((_, value)) = var("HOST") {
            config.host = value;
        }
        if let Some((name, value)) = var("PORT") {
            config.port = Some(parse(name, value)?);
        }
        if let Some((_, value)) = var("DATABASE") {
            config.database = value;
        }
        if let Some((_, value)) = var("USERNAME") {
            config.username = Some(value);
        }
        if let Some((_, value)) = var("PASSWORD") {
            config.password = Some(value);
        }
        if let Some((name, value)) = var("CONNECT_TIMEOUT_MS") {
            config.connect_timeout_ms = parse(name, value)?;
        }
        if let Some((name, value)) = var("SOCKET_TIMEOUT_MS") {
            config.socket_timeout_ms = parse(name, value)?;
        }
        if let Some((_, value)) = var("SOCKET_PATH") {
            config.socket_path = Some(PathBuf::from(value));
        }
        if let Some((name, value)) = var("EMBEDDED") {
            config.embedded = parse(name, value)?;
        }
        if let Some((name, value)) = var("MAX_IDLE") {
            config.max_idle = parse(name, value)?;
        }
        Ok(config)
    }

    /// Transport the index engine connects through.
    pub fn transport(&self) -> Transport {
        if self.embedded {
            return Transport::Embedded(self.database.clone());
        }
        match &self.socket_path {
            Some(path) => Transport::Unix(path.clone()),
            None => Transport::Tcp {
                host: self.host.clone(),
                port: self.port.unwrap_or(REDIS_PORT),
            },
        }
    }

    /// Redis connection settings; a non-numeric database selects index 0.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            db: self.database.parse().unwrap_or(0),
            username: self.username.clone(),
            password: self.password.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            socket_timeout: Duration::from_millis(self.socket_timeout_ms),
            max_idle: self.max_idle,
        }
    }

    /// MongoDB connection settings.
    #[cfg(feature = "mongodb")]
    pub fn document_options(&self) -> edgevault_docstore::DocumentOptions {
        edgevault_docstore::DocumentOptions {
            host: self.host.clone(),
            port: self.port.unwrap_or(MONGODB_PORT),
            database: if self.database.is_empty() {
                "edgevault".to_string()
            } else {
                self.database.clone()
            },
            username: self.username.clone(),
            password: self.password.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            socket_timeout: Duration::from_millis(self.socket_timeout_ms),
        }
    }
}

fn parse<T: FromStr>(var: String, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidVar { var, value })
}

/// Persistence backends selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// MongoDB document store (`mongodb`, `document`).
    Document,
    /// Index engine over Redis or an embedded keyspace (`redisdb`, `index`).
    Index,
    /// Process-local store (`memorydb`, `memory`).
    Memory,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "document" => Ok(Self::Document),
            "redisdb" | "index" => Ok(Self::Index),
            "memorydb" | "memory" => Ok(Self::Memory),
            _ => Err(StoreError::UnsupportedBackend(s.to_string())),
        }
    }
}
