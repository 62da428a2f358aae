//! Interaction-core settings.
//!
//! # Responsibility
//! - Parse JSON settings supplied by the host; every field is optional.
//! - Validate values before any store is constructed from them.
//!
//! # Invariants
//! - A validated config always has `undo_window_seconds >= 1`.
//! - Storage keys match `^[a-z0-9][a-z0-9._-]*$`.

use crate::logging::{default_log_level, normalize_level};
use crate::service::saved_query_service::SAVED_QUERIES_STORAGE_KEY;
use crate::shortcut::{Platform, PlatformPolicy};
use crate::undo::DEFAULT_UNDO_WINDOW_SECONDS;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static STORAGE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("valid storage key regex"));

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidLogLevel(String),
    InvalidUndoWindow(u32),
    InvalidStorageKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidLogLevel(value) => write!(f, "unsupported log level `{value}`"),
            Self::InvalidUndoWindow(value) => {
                write!(f, "undo_window_seconds must be at least 1, got {value}")
            }
            Self::InvalidStorageKey(value) => write!(f, "invalid storage key `{value}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<String>,
    pub undo_window_seconds: u32,
    pub platform: Platform,
    pub collapse_ctrl_meta: bool,
    pub saved_queries_key: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            undo_window_seconds: DEFAULT_UNDO_WINDOW_SECONDS,
            platform: Platform::current(),
            collapse_ctrl_meta: true,
            saved_queries_key: SAVED_QUERIES_STORAGE_KEY.to_string(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates settings JSON; missing fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_level(&self.log_level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        if self.undo_window_seconds == 0 {
            return Err(ConfigError::InvalidUndoWindow(self.undo_window_seconds));
        }
        if !STORAGE_KEY_RE.is_match(&self.saved_queries_key) {
            return Err(ConfigError::InvalidStorageKey(
                self.saved_queries_key.clone(),
            ));
        }
        Ok(())
    }

    pub fn platform_policy(&self) -> PlatformPolicy {
        PlatformPolicy::new(self.platform, self.collapse_ctrl_meta)
    }
}
