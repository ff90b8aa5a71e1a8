use crate::CapturedFrame;
use thiserror::Error;
use tmon_config::CaptureConfig;
use tracing::{debug, info};

/// Anything that can hand out batches of raw frames.
///
/// The capture loop pulls from a `PacketSource` and runs the throughput
/// tracker synchronously for each frame, so implementations may block
/// inside `next_batch` but should return periodically (a read timeout)
/// so that shutdown requests are noticed.
pub trait PacketSource {
    /// Deliver up to one batch of frames to `handler`. Returns the number
    /// of frames delivered; zero means the read timed out with no traffic.
    fn next_batch(
        &mut self,
        handler: &mut dyn FnMut(&CapturedFrame<'_>),
    ) -> Result<usize, CaptureError>;

    /// Name of the interface being captured.
    fn interface_name(&self) -> &str;
}

/// Live capture from a network interface via libpcap.
pub struct PcapSource {
    capture: pcap::Capture<pcap::Active>,
    interface: String,
    batch_size: usize,
}

impl PcapSource {
    /// Open `interface` for live capture and install the configured
    /// filter. Both steps are fatal at startup if they fail.
    pub fn open(interface: &str, config: &CaptureConfig) -> Result<Self, CaptureError> {
        debug!("Opening {interface} for capture");
        let mut capture = pcap::Capture::from_device(interface)
            .and_then(|c| {
                c.promisc(config.promiscuous)
                    .snaplen(config.snaplen)
                    .timeout(config.read_timeout_ms)
                    .immediate_mode(true)
                    .open()
            })
            .map_err(|e| CaptureError::Open {
                interface: interface.to_string(),
                reason: e.to_string(),
            })?;

        capture
            .filter(&config.filter, true)
            .map_err(|e| CaptureError::Filter {
                filter: config.filter.clone(),
                reason: e.to_string(),
            })?;
        info!("Capturing on {interface} with filter \"{}\"", config.filter);

        Ok(Self {
            capture,
            interface: interface.to_string(),
            batch_size: config.batch_size,
        })
    }
}

impl PacketSource for PcapSource {
    fn next_batch(
        &mut self,
        handler: &mut dyn FnMut(&CapturedFrame<'_>),
    ) -> Result<usize, CaptureError> {
        let mut delivered = 0;
        while delivered < self.batch_size {
            match self.capture.next_packet() {
                Ok(packet) => {
                    let frame = CapturedFrame {
                        capture_len: packet.header.caplen,
                        wire_len: packet.header.len,
                        timestamp_secs: u64::try_from(packet.header.ts.tv_sec).unwrap_or(0),
                        data: packet.data,
                    };
                    handler(&frame);
                    delivered += 1;
                }
                Err(pcap::Error::TimeoutExpired) => break,
                Err(e) => return Err(CaptureError::Read(e.to_string())),
            }
        }
        Ok(delivered)
    }

    fn interface_name(&self) -> &str {
        &self.interface
    }
}

/// Packet capture failures.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The interface could not be opened.
    #[error("Unable to open device {interface}: {reason}")]
    Open {
        /// Interface name
        interface: String,
        /// libpcap's explanation
        reason: String,
    },
    /// The filter could not be compiled or installed.
    #[error("Unable to apply filter \"{filter}\": {reason}")]
    Filter {
        /// Filter expression
        filter: String,
        /// libpcap's explanation
        reason: String,
    },
    /// Reading from an open capture failed.
    #[error("Capture read failed: {0}")]
    Read(String),
}
