use crate::{
    submission_queue::{ReportSender, Submission},
    transport_data::{PacketEvent, StatsSnapshot},
};

/// Where the throughput tracker hands its output. Implementations must
/// return promptly: they are called inline on the capture path.
pub trait ReportSink {
    /// Hand over a closed second's statistics.
    fn submit_snapshot(&self, snapshot: StatsSnapshot);

    /// Hand over one accepted frame.
    fn submit_packet(&self, event: PacketEvent);
}

impl ReportSink for ReportSender {
    fn submit_snapshot(&self, snapshot: StatsSnapshot) {
        self.enqueue(Submission::Snapshot(Box::new(snapshot)));
    }

    fn submit_packet(&self, event: PacketEvent) {
        self.enqueue(Submission::Packet(event));
    }
}
