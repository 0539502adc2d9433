//! User configuration: where the data lives and how the tracker behaves.
//! Everything is optional; a missing `config.toml` means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bmi-tracker";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "bmiDB.db";
/// Optional configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Log output file; the terminal belongs to the UI.
pub const LOG_FILE_NAME: &str = "bmi-tracker.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDir,

    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid log level {filter:?}: {source}")]
    LogFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Which record store to build at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the SQLite file. Relative paths resolve against the
    /// data directory.
    pub database_path: Option<PathBuf>,
    pub storage: StorageBackend,
    /// Also record results that are not a number (stored as `NaN`).
    pub record_invalid: bool,
    /// `tracing` filter directive, e.g. `info` or `bmi_tracker=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            storage: StorageBackend::Sqlite,
            record_invalid: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse TOML text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Database file to open, or `None` when storage is disabled.
    pub fn resolved_database_path(&self, data_dir: &Path) -> Option<PathBuf> {
        if self.storage == StorageBackend::Disabled {
            return None;
        }
        let path = match &self.database_path {
            Some(path) => data_dir.join(path),
            None => data_dir.join(DB_FILE_NAME),
        };
        Some(path)
    }

    /// Log filter: `RUST_LOG` wins, then the configured level.
    pub fn log_filter(&self) -> Result<EnvFilter, ConfigError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.log_level).map_err(|source| ConfigError::LogFilter {
            filter: self.log_level.clone(),
            source,
        })
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
