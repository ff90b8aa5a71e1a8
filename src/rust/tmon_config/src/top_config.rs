//! Top-level configuration file for the traffic monitor.

use crate::{CaptureConfig, ReportingConfig, TrackingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use toml_edit::DocumentMut;
use tracing::{error, info};

/// Where the daemon looks for its configuration unless told otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/tmon.conf";

/// Top-level configuration file for the traffic monitor.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Packet capture settings
    pub capture: CaptureConfig,

    /// Per-address tracking settings
    pub tracking: TrackingConfig,

    /// Remote collector settings
    pub reporting: ReportingConfig,
}

impl Config {
    /// Loads the configuration from `path`. A missing file is not an
    /// error: the defaults are returned instead.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("{} does not exist, using default settings", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!("Unable to read contents of {}", path.display());
            ConfigError::CannotReadFile(e.to_string())
        })?;
        Self::load_from_string(&raw)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn load_from_string(raw: &str) -> Result<Self, ConfigError> {
        let document = raw.parse::<DocumentMut>().map_err(|e| {
            error!("Unable to parse TOML configuration");
            error!("Full error: {:?}", e);
            ConfigError::CannotParseToml(e.to_string())
        })?;
        let config = toml_edit::de::from_document::<Config>(document).map_err(|e| {
            error!("Unable to deserialize TOML configuration");
            error!("Full error: {:?}", e);
            ConfigError::CannotParseToml(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Test if a configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.batch_size == 0 {
            return Err(ConfigError::Invalid("capture.batch_size must be at least 1".to_string()));
        }
        if self.capture.snaplen <= 0 {
            return Err(ConfigError::Invalid("capture.snaplen must be positive".to_string()));
        }
        if self.tracking.max_addresses == 0 {
            return Err(ConfigError::Invalid("tracking.max_addresses must be at least 1".to_string()));
        }
        if self.reporting.queue_depth == 0 {
            return Err(ConfigError::Invalid("reporting.queue_depth must be at least 1".to_string()));
        }
        if self.reporting.max_in_flight == 0 {
            return Err(ConfigError::Invalid("reporting.max_in_flight must be at least 1".to_string()));
        }
        if let Some(url) = &self.reporting.base_url {
            validate_base_url(url)?;
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the file settings.
    /// `None` leaves the file (or default) value in place.
    pub fn with_overrides(
        mut self,
        filter: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(filter) = filter {
            self.capture.filter = filter;
        }
        if let Some(url) = base_url {
            validate_base_url(&url)?;
            self.reporting.base_url = Some(url);
        }
        Ok(self)
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "reporting.base_url must start with http:// or https:// (got {url})"
        )))
    }
}

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Unable to read configuration file: {0}")]
    CannotReadFile(String),
    /// The file is not valid TOML, or does not match the schema.
    #[error("Unable to parse configuration: {0}")]
    CannotParseToml(String),
    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
