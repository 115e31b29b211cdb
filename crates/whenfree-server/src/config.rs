//! Configuration loading and typed config structures for the meetup server.
//!
//! The configuration lives in `whenfree-config.yaml` next to the binary's
//! working directory, or wherever `WHENFREE_CONFIG` points. Every field has
//! a default, so a missing file or a partial one is fine. A handful of
//! deployment settings can also be overridden through the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use whenfree_api::{AccessPolicy, ServerConfig};
use whenfree_store::SnapshotFile;

/// Config file read when `WHENFREE_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "whenfree-config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "WHENFREE_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override carried an unusable value.
    #[error("invalid value {value:?} for {key}: {source}")]
    Override {
        /// The environment variable.
        key: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        source: std::num::ParseIntError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration, mirroring `whenfree-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ListenConfig,

    /// Where the snapshot lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// How refused lookups are reported.
    #[serde(default)]
    pub access: AccessConfig,

    /// Log filtering and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, all-defaults config.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load the configuration the process should run with.
    ///
    /// Reads the file named by `WHENFREE_CONFIG`, or
    /// [`DEFAULT_CONFIG_PATH`] if that variable is unset. A missing default
    /// file means defaults; a missing explicitly named file is an error.
    /// Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or
    /// an override is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `WHENFREE_HOST`, `WHENFREE_PORT` and `WHENFREE_SNAPSHOT_PATH`
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] if `WHENFREE_PORT` is not a port
    /// number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `var`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] if the port override is not a
    /// port number.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("WHENFREE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("WHENFREE_PORT") {
            self.server.port = val.parse().map_err(|source| ConfigError::Override {
                key: "WHENFREE_PORT",
                value: val.clone(),
                source,
            })?;
        }
        if let Some(val) = var("WHENFREE_SNAPSHOT_PATH") {
            self.storage.snapshot_path = PathBuf::from(val);
        }
        Ok(())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl From<&ListenConfig> for ServerConfig {
    fn from(config: &ListenConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file loaded at startup and written at shutdown.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl StorageConfig {
    /// The snapshot file this config points at.
    pub fn snapshot_file(&self) -> SnapshotFile {
        SnapshotFile::new(&self.snapshot_path)
    }
}

/// Access reporting configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AccessConfig {
    /// Answer `404` instead of `403` when a token may not see a meetup.
    #[serde(default)]
    pub conceal_existence: bool,
}

impl From<AccessConfig> for AccessPolicy {
    fn from(config: AccessConfig) -> Self {
        Self {
            conceal_existence: config.conceal_existence,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("storage.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}
