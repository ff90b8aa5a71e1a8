use serde::{Deserialize, Serialize};

/// Per-address tracking settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    /// Maximum number of distinct addresses tracked individually.
    /// Addresses beyond this only count towards the global totals.
    pub max_addresses: usize,

    /// Print a console line for every accepted frame.
    pub print_packets: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_addresses: 100,
            print_packets: true,
        }
    }
}
