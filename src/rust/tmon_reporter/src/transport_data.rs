//! Message shapes accepted by the remote collector.

use serde::{Deserialize, Serialize};
use tmon_capture::{ClassifiedFrame, TransportProtocol};
use tmon_utils::units::Direction;

/// Global statistics, posted to `<base>/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalUpdate {
    /// Bytes seen since capture start
    pub total: u64,
    /// Largest single-second byte count since capture start
    pub peak: u64,
    /// 2 second average, bytes/second
    pub avg2: f32,
    /// 10 second average, bytes/second
    pub avg10: f32,
    /// 40 second average, bytes/second
    pub avg40: f32,
}

/// One address+direction entry of the per-address batch, posted as a
/// JSON array to `<base>/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressUpdate {
    /// The address, dotted quad
    pub ip: String,
    /// `send` or `recv`
    pub direction: Direction,
    /// Bytes seen in this direction since the address was first tracked
    pub total: u64,
    /// Largest single-second byte count over the last 40 seconds
    pub peak: u64,
    /// 2 second average, bytes/second
    pub avg2: f32,
    /// 10 second average, bytes/second
    pub avg10: f32,
    /// 40 second average, bytes/second
    pub avg40: f32,
}

/// Per-packet event, posted to `<base>/packets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketEvent {
    /// `TCP`, `UDP`, `ICMP` or `OTHER`
    #[serde(rename = "type")]
    pub protocol: TransportProtocol,
    /// Source address
    pub src: String,
    /// Source port
    pub sport: u16,
    /// Destination address
    pub dst: String,
    /// Destination port
    pub dport: u16,
    /// Wire length of the frame
    pub size: u32,
}

impl From<&ClassifiedFrame> for PacketEvent {
    fn from(frame: &ClassifiedFrame) -> Self {
        Self {
            protocol: frame.protocol,
            src: frame.src.clone(),
            sport: frame.src_port,
            dst: frame.dst.clone(),
            dport: frame.dst_port,
            size: frame.wire_len,
        }
    }
}

/// One second's consolidated statistics. Built fresh at every second
/// boundary and handed over by value; nothing keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Global statistics
    pub global: GlobalUpdate,
    /// Every tracked address+direction with a nonzero total
    pub addresses: Vec<AddressUpdate>,
}
