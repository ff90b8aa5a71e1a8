//! Manages the `/etc/tmon.conf` file.
//!
//! Every section and every field is optional: a missing file, or a file
//! that only sets a handful of values, yields the built-in defaults for
//! everything else.

#![warn(missing_docs)]

mod capture;
mod reporting;
mod top_config;
mod tracking;

pub use capture::CaptureConfig;
pub use reporting::ReportingConfig;
pub use top_config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use tracking::TrackingConfig;
