use crate::throughput_tracker::ThroughputMonitor;
use std::sync::atomic::{AtomicBool, Ordering};
use tmon_capture::PacketSource;
use tmon_reporter::ReportSink;
use tracing::{debug, error};

/// Pull batches from `source` until `running` is cleared or the source
/// fails. The flag is checked between batches, so the source's read
/// timeout bounds how long a shutdown request waits.
pub(crate) fn run<P, S>(source: &mut P, monitor: &mut ThroughputMonitor<S>, running: &AtomicBool)
where
    P: PacketSource + ?Sized,
    S: ReportSink,
{
    debug!("Capture loop starting on {}", source.interface_name());
    while running.load(Ordering::Relaxed) {
        let result = source.next_batch(&mut |frame| {
            monitor.process_frame(frame);
        });
        if let Err(e) = result {
            error!("Capture on {} failed: {e}", source.interface_name());
            break;
        }
    }
    debug!("Capture loop finished");
}
