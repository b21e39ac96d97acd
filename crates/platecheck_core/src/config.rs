//! Process configuration for core consumers.
//!
//! # Responsibility
//! - Read database, logging and well-known list settings from environment.
//! - Validate values once, before any connection or logger is opened.
//!
//! # Invariants
//! - Blank variables count as unset and fall back to defaults.
//! - A configured list name is never blank, and allow/deny names differ.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::model::list::ListNames;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PLATECHECK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PLATECHECK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PLATECHECK_LOG_DIR";
pub const ENV_ALLOW_LIST: &str = "PLATECHECK_ALLOW_LIST";
pub const ENV_DENY_LIST: &str = "PLATECHECK_DENY_LIST";

const DEFAULT_DB_FILE_NAME: &str = "platecheck.sqlite3";

/// Configuration errors, one per rejected variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, reason } => write!(f, "invalid {key}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// Normalized `trace|debug|info|warn|error`.
    pub log_level: &'static str,
    /// Absolute log directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    pub list_names: ListNames,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            list_names: ListNames::default(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|reason| {
                ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    reason,
                }
            })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|reason| {
                ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    reason,
                }
            })?);
        }
        if let Some(name) = read(ENV_ALLOW_LIST) {
            config.list_names.allow = name;
        }
        if let Some(name) = read(ENV_DENY_LIST) {
            config.list_names.deny = name;
        }

        if config.list_names.allow == config.list_names.deny {
            return Err(ConfigError::InvalidValue {
                key: ENV_DENY_LIST,
                reason: format!(
                    "deny list name `{}` must differ from allow list name",
                    config.list_names.deny
                ),
            });
        }

        Ok(config)
    }

    /// Log directory as UTF-8 text for `init_logging`.
    pub fn log_dir_str(&self) -> Option<&str> {
        self.log_dir.as_deref().and_then(|dir| dir.to_str())
    }
}
