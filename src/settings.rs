//! Client settings.
//!
//! Loaded from a JSON file when one exists, otherwise from environment variables:
//! - `TASKLIST_API_URL` - base URL of the task service (required)
//! - `TASKLIST_API_TOKEN` - bearer token sent with every request
//! - `TASKLIST_API_TIMEOUT_SECS` - per-request timeout; none when unset

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::notify::Position;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Settings for talking to the remote task service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL; the `/tasks` resource lives directly under it.
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub notify_position: Position,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_secs: None,
            notify_position: Position::default(),
        }
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build settings from `TASKLIST_*` environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Prefer the file at `path`; fall back to the environment when it is absent.
    pub fn load_or_env(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            let settings = Self::load(path)?;
            tracing::info!("Loaded client settings from {}", path.display());
            Ok(settings)
        } else {
            tracing::info!(
                "No settings file found at {}, using environment",
                path.display()
            );
            Self::from_env()
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let base_url = lookup("TASKLIST_API_URL").ok_or(SettingsError::Missing("TASKLIST_API_URL"))?;

        let timeout_secs = match lookup("TASKLIST_API_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                SettingsError::InvalidValue {
                    name: "TASKLIST_API_TIMEOUT_SECS",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        let settings = Self {
            base_url,
            api_token: lookup("TASKLIST_API_TOKEN").filter(|t| !t.is_empty()),
            timeout_secs,
            notify_position: Position::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// The base URL must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|source| SettingsError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SettingsError::UnsupportedScheme(other.to_string())),
        }
    }
}
