use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Transport-layer bucket a frame is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportProtocol {
    /// IP protocol 6
    Tcp,
    /// IP protocol 17
    Udp,
    /// IP protocol 1
    Icmp,
    /// Anything else
    Other,
}

impl TransportProtocol {
    /// Map an IPv4 header protocol number to its bucket.
    pub fn from_ip_protocol(proto: u8) -> Self {
        match proto {
            6 => Self::Tcp,
            17 => Self::Udp,
            1 => Self::Icmp,
            _ => Self::Other,
        }
    }

    /// Does this protocol carry source/destination ports?
    pub fn has_ports(&self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }

    /// Upper-case name, as printed and reported.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Icmp => "ICMP",
            Self::Other => "OTHER",
        }
    }
}

impl Display for TransportProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_numbers() {
        assert_eq!(TransportProtocol::from_ip_protocol(6), TransportProtocol::Tcp);
        assert_eq!(TransportProtocol::from_ip_protocol(17), TransportProtocol::Udp);
        assert_eq!(TransportProtocol::from_ip_protocol(1), TransportProtocol::Icmp);
        assert_eq!(TransportProtocol::from_ip_protocol(47), TransportProtocol::Other);
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(serde_json::to_string(&TransportProtocol::Icmp).unwrap(), "\"ICMP\"");
        assert_eq!(serde_json::to_string(&TransportProtocol::Other).unwrap(), "\"OTHER\"");
    }
}
