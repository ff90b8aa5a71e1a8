use crate::{
    stats::{FRAMES_ACCEPTED, FRAMES_REJECTED, FRAMES_SEEN},
    CapturedFrame, ClassifiedFrame, TransportProtocol,
};
use byteorder::{BigEndian, ByteOrder};
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering::Relaxed;

/// Ethernet II header length. Everything we classify sits behind one.
const ETHERNET_HEADER_LEN: usize = 14;

/// Smallest IPv4 header (no options).
const MIN_IPV4_HEADER_LEN: usize = 20;

/// Frames shorter than this can't hold a link header and an IPv4 header,
/// and are skipped without touching any traffic statistics.
pub const MIN_CAPTURE_LENGTH: u32 = (ETHERNET_HEADER_LEN + MIN_IPV4_HEADER_LEN) as u32;

// Offsets within the IPv4 header
const IP_PROTOCOL: usize = 9;
const IP_SRC: usize = 12;
const IP_DST: usize = 16;

/// Classify one captured frame.
///
/// Returns `None` for frames too short to carry an IPv4 header. No
/// checksum, version or fragmentation checks are made: the capture
/// filter is trusted to have selected IP traffic.
pub fn classify(frame: &CapturedFrame) -> Option<ClassifiedFrame> {
    FRAMES_SEEN.fetch_add(1, Relaxed);
    if frame.capture_len < MIN_CAPTURE_LENGTH
        || frame.data.len() < MIN_CAPTURE_LENGTH as usize
    {
        FRAMES_REJECTED.fetch_add(1, Relaxed);
        return None;
    }

    let ip = &frame.data[ETHERNET_HEADER_LEN..];
    let protocol = TransportProtocol::from_ip_protocol(ip[IP_PROTOCOL]);
    let src = read_ipv4(&ip[IP_SRC..IP_SRC + 4]);
    let dst = read_ipv4(&ip[IP_DST..IP_DST + 4]);

    let (src_port, dst_port) = if protocol.has_ports() {
        let header_len = ((ip[0] & 0x0F) as usize) * 4;
        read_ports(ip, header_len)
    } else {
        (0, 0)
    };

    FRAMES_ACCEPTED.fetch_add(1, Relaxed);
    Some(ClassifiedFrame {
        protocol,
        src: src.to_string(),
        src_port,
        dst: dst.to_string(),
        dst_port,
        wire_len: frame.wire_len,
    })
}

fn read_ipv4(octets: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])
}

/// TCP and UDP both open with source then destination port. Truncated
/// captures report zero ports.
fn read_ports(ip: &[u8], header_len: usize) -> (u16, u16) {
    match ip.get(header_len..header_len + 4) {
        Some(ports) => (
            BigEndian::read_u16(&ports[0..2]),
            BigEndian::read_u16(&ports[2..4]),
        ),
        None => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an Ethernet + IPv4 (+ optional ports) frame.
    fn build_frame(proto: u8, src: [u8; 4], dst: [u8; 4], ports: Option<(u16, u16)>) -> Vec<u8> {
        let mut data = vec![0u8; ETHERNET_HEADER_LEN];
        data[12] = 0x08; // IPv4 ethertype
        let mut ip = vec![0u8; MIN_IPV4_HEADER_LEN];
        ip[0] = 0x45;
        ip[IP_PROTOCOL] = proto;
        ip[IP_SRC..IP_SRC + 4].copy_from_slice(&src);
        ip[IP_DST..IP_DST + 4].copy_from_slice(&dst);
        data.extend_from_slice(&ip);
        if let Some((sport, dport)) = ports {
            data.extend_from_slice(&sport.to_be_bytes());
            data.extend_from_slice(&dport.to_be_bytes());
            data.extend_from_slice(&[0u8; 16]);
        }
        data
    }

    fn captured(data: &[u8], wire_len: u32) -> CapturedFrame<'_> {
        CapturedFrame {
            capture_len: data.len() as u32,
            wire_len,
            timestamp_secs: 1_700_000_000,
            data,
        }
    }

    #[test]
    fn tcp_frame_with_ports() {
        let data = build_frame(6, [10, 0, 0, 1], [10, 0, 0, 2], Some((443, 5555)));
        let result = classify(&captured(&data, 1500)).unwrap();
        assert_eq!(result.protocol, TransportProtocol::Tcp);
        assert_eq!(result.src, "10.0.0.1");
        assert_eq!(result.dst, "10.0.0.2");
        assert_eq!(result.src_port, 443);
        assert_eq!(result.dst_port, 5555);
        assert_eq!(result.wire_len, 1500);
        assert_eq!(result.to_string(), "[TCP] 10.0.0.1:443 -> 10.0.0.2:5555 (1500 B)");
    }

    #[test]
    fn udp_frame_with_ports() {
        let data = build_frame(17, [192, 168, 1, 5], [8, 8, 8, 8], Some((40000, 53)));
        let result = classify(&captured(&data, 80)).unwrap();
        assert_eq!(result.protocol, TransportProtocol::Udp);
        assert_eq!(result.dst_port, 53);
    }

    #[test]
    fn icmp_has_no_ports() {
        let data = build_frame(1, [10, 0, 0, 1], [10, 0, 0, 2], Some((0x0800, 0x1234)));
        let result = classify(&captured(&data, 84)).unwrap();
        assert_eq!(result.protocol, TransportProtocol::Icmp);
        assert_eq!((result.src_port, result.dst_port), (0, 0));
        assert_eq!(result.to_string(), "[ICMP] 10.0.0.1 -> 10.0.0.2 (84 B)");
    }

    #[test]
    fn unknown_protocol_is_other() {
        let data = build_frame(47, [10, 0, 0, 1], [10, 0, 0, 2], None);
        let result = classify(&captured(&data, 100)).unwrap();
        assert_eq!(result.protocol, TransportProtocol::Other);
    }

    #[test]
    fn truncated_ports_are_zero() {
        let data = build_frame(6, [10, 0, 0, 1], [10, 0, 0, 2], None);
        assert_eq!(data.len(), MIN_CAPTURE_LENGTH as usize);
        let result = classify(&captured(&data, 60)).unwrap();
        assert_eq!(result.protocol, TransportProtocol::Tcp);
        assert_eq!((result.src_port, result.dst_port), (0, 0));
    }

    #[test]
    fn ip_options_shift_ports() {
        let mut data = build_frame(6, [10, 0, 0, 1], [10, 0, 0, 2], None);
        data[ETHERNET_HEADER_LEN] = 0x46; // IHL = 6 words
        data.extend_from_slice(&[0u8; 4]); // options
        data.extend_from_slice(&80u16.to_be_bytes());
        data.extend_from_slice(&9000u16.to_be_bytes());
        let result = classify(&captured(&data, 200)).unwrap();
        assert_eq!((result.src_port, result.dst_port), (80, 9000));
    }

    #[test]
    fn short_frame_rejected() {
        let data = build_frame(6, [10, 0, 0, 1], [10, 0, 0, 2], None);
        let short = &data[..33];
        assert!(classify(&captured(short, 33)).is_none());
    }

    #[test]
    fn declared_length_below_floor_rejected() {
        let data = build_frame(6, [10, 0, 0, 1], [10, 0, 0, 2], Some((1, 2)));
        let frame = CapturedFrame {
            capture_len: 33,
            wire_len: 1500,
            timestamp_secs: 0,
            data: &data,
        };
        assert!(classify(&frame).is_none());
    }
}
