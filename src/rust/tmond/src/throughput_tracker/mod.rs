mod address_registry;
mod emission;
mod throughput_entry;
mod tracking_data;

use self::{
    emission::{EmissionTrigger, TriggerState},
    tracking_data::WindowAggregator,
};
use tmon_capture::{classify, CapturedFrame};
use tmon_reporter::{
    transport_data::{PacketEvent, StatsSnapshot},
    ReportSink,
};

/// Length of every per-second history ring.
pub(crate) const WINDOW_SECONDS: usize = 40;

/// Trailing windows the averages are taken over, in seconds.
pub(crate) const AVERAGE_WINDOWS: [usize; 3] = [2, 10, 40];

/// Drives classification, aggregation and emission for one capture.
///
/// Each frame is handled to completion before the next one is accepted:
/// classify, report the packet, check for a second boundary (emitting
/// the closed second's snapshot if there is one), then account the frame.
pub(crate) struct ThroughputMonitor<S: ReportSink> {
    aggregator: WindowAggregator,
    trigger: EmissionTrigger,
    sink: S,
    print_packets: bool,
    snapshots_emitted: u64,
}

impl<S: ReportSink> ThroughputMonitor<S> {
    pub(crate) fn new(max_addresses: usize, start_second: u64, sink: S, print_packets: bool) -> Self {
        Self {
            aggregator: WindowAggregator::new(max_addresses),
            trigger: EmissionTrigger::new(start_second),
            sink,
            print_packets,
            snapshots_emitted: 0,
        }
    }

    /// Returns `false` if the frame was rejected by the classifier.
    pub(crate) fn process_frame(&mut self, frame: &CapturedFrame) -> bool {
        let Some(classified) = classify(frame) else {
            return false;
        };
        if self.print_packets {
            println!("{classified}");
        }
        self.sink.submit_packet(PacketEvent::from(&classified));

        if let TriggerState::AtBoundary { elapsed } = self.trigger.observe(frame.timestamp_secs) {
            let snapshot = self.aggregator.close_second(elapsed);
            self.sink.submit_snapshot(snapshot);
            self.snapshots_emitted += 1;
        }

        let src = self.aggregator.lookup_or_create(&classified.src);
        let dst = self.aggregator.lookup_or_create(&classified.dst);
        self.aggregator.record_frame(src, dst, classified.wire_len);
        true
    }

    /// Current totals, without closing the second.
    pub(crate) fn current_totals(&self) -> StatsSnapshot {
        self.aggregator.build_snapshot()
    }

    pub(crate) fn snapshots_emitted(&self) -> u64 {
        self.snapshots_emitted
    }
}
