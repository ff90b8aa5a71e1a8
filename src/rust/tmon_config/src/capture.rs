use serde::{Deserialize, Serialize};

/// Packet capture settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// libpcap filter expression, passed through verbatim.
    pub filter: String,

    /// Maximum number of octets captured per frame.
    pub snaplen: i32,

    /// Put the interface into promiscuous mode?
    pub promiscuous: bool,

    /// libpcap read timeout. Also bounds how long a shutdown request
    /// waits before the capture loop notices it.
    pub read_timeout_ms: i32,

    /// Maximum number of frames pulled from the source per batch.
    pub batch_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            filter: "ip".to_string(),
            snaplen: 65535,
            promiscuous: true,
            read_timeout_ms: 1000,
            batch_size: 64,
        }
    }
}
