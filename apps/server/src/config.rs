//! # Server Configuration
//!
//! Where the server listens, which store backs it, and how the catalog
//! treats duplicate barcodes.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_PORT=9000                                                │
//! │     STOCKROOM_BACKEND=local                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOCKROOM_CONFIG, or                                              │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     127.0.0.1:8080, SQLite in the platform data dir, duplicates allowed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockroom.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [storage]
//! backend = "sqlite"   # sqlite | local
//! path = "/var/lib/stockroom/stockroom.db"
//!
//! [catalog]
//! duplicate_policy = "allow"   # allow | reject
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stockroom_db::DuplicatePolicy;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Storage Backend
// =============================================================================

/// Which [`ProductStore`](stockroom_db::ProductStore) the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite database file.
    #[default]
    Sqlite,

    /// Single JSON key-value file.
    Local,
}

impl StorageBackend {
    /// File name used when no path is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "stockroom.db",
            StorageBackend::Local => "stockroom.json",
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sql" => Ok(StorageBackend::Sqlite),
            "local" | "json" | "kv" => Ok(StorageBackend::Local),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, local",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 127.0.0.1, local access only).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Store file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// The configured path, or `<data dir>/stockroom.{db,json}`.
    ///
    /// Falls back to the working directory when the platform has no data
    /// directory (e.g. no `$HOME`).
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        let file_name = self.backend.default_file_name();
        match directories::ProjectDirs::from("com", "stockroom", "stockroom") {
            Some(dirs) => dirs.data_dir().join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$STOCKROOM_CONFIG`, or the platform path)
    /// 3. Environment variables
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("STOCKROOM_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr must not be empty".into()));
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("storage path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies `STOCKROOM_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("STOCKROOM_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("STOCKROOM_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Invalid STOCKROOM_PORT in environment"),
            }
        }

        if let Some(backend) = lookup("STOCKROOM_BACKEND") {
            match backend.parse::<StorageBackend>() {
                Ok(b) => {
                    debug!(backend = %b, "Overriding storage backend from environment");
                    self.storage.backend = b;
                }
                Err(e) => warn!(error = %e, "Ignoring STOCKROOM_BACKEND"),
            }
        }

        if let Some(path) = lookup("STOCKROOM_DB_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(policy) = lookup("STOCKROOM_DUPLICATE_POLICY") {
            match policy.parse::<DuplicatePolicy>() {
                Ok(p) => self.catalog.duplicate_policy = p,
                Err(e) => warn!(error = %e, "Ignoring STOCKROOM_DUPLICATE_POLICY"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }
}
