use crate::TransportProtocol;
use std::fmt::Display;

/// One raw frame as delivered by a [`crate::PacketSource`].
#[derive(Debug, Clone, Copy)]
pub struct CapturedFrame<'a> {
    /// Number of octets actually captured.
    pub capture_len: u32,
    /// Length of the frame on the wire.
    pub wire_len: u32,
    /// Wall-clock arrival time, whole seconds since the UNIX epoch.
    pub timestamp_secs: u64,
    /// The captured octets, starting at the link-layer header.
    pub data: &'a [u8],
}

/// The result of classifying an accepted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFrame {
    /// Transport protocol bucket
    pub protocol: TransportProtocol,
    /// Source address, dotted quad
    pub src: String,
    /// Source port (0 for ICMP and other protocols)
    pub src_port: u16,
    /// Destination address, dotted quad
    pub dst: String,
    /// Destination port (0 for ICMP and other protocols)
    pub dst_port: u16,
    /// Length of the frame on the wire
    pub wire_len: u32,
}

impl Display for ClassifiedFrame {
    /// Console progress line, e.g. `[TCP] 10.0.0.1:443 -> 10.0.0.2:5555 (1500 B)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.protocol.has_ports() {
            write!(
                f,
                "[{}] {}:{} -> {}:{} ({} B)",
                self.protocol, self.src, self.src_port, self.dst, self.dst_port, self.wire_len
            )
        } else {
            write!(
                f,
                "[{}] {} -> {} ({} B)",
                self.protocol, self.src, self.dst, self.wire_len
            )
        }
    }
}
