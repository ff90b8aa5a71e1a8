use serde::{Deserialize, Serialize};

/// Remote collector settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportingConfig {
    /// Base URL of the collector, e.g. `http://172.30.127.8:5000/api`.
    /// Reporting is disabled when absent.
    pub base_url: Option<String>,

    /// Submissions waiting for the reporting worker. New submissions
    /// are dropped while the queue is full.
    pub queue_depth: usize,

    /// Maximum number of HTTP requests in flight at once.
    pub max_in_flight: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            queue_depth: 1024,
            max_in_flight: 16,
        }
    }
}
