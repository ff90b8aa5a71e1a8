//! Packet capture and frame classification for the traffic monitor.
//!
//! A [`PacketSource`] hands out batches of raw link-layer frames; the
//! [`classify`] function turns each one into a [`ClassifiedFrame`] that
//! the throughput tracker and the per-packet reporter consume.

#![warn(missing_docs)]

mod classifier;
mod frame;
mod pcap_source;
mod protocol;
pub mod stats;

pub use classifier::{classify, MIN_CAPTURE_LENGTH};
pub use frame::{CapturedFrame, ClassifiedFrame};
pub use pcap_source::{CaptureError, PacketSource, PcapSource};
pub use protocol::TransportProtocol;
