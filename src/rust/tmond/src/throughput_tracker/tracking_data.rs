use super::{
    address_registry::{AddressLookup, AddressRegistry},
    throughput_entry::{GlobalSecondStat, RollingAverages},
    AVERAGE_WINDOWS, WINDOW_SECONDS,
};
use tmon_reporter::transport_data::{AddressUpdate, GlobalUpdate, StatsSnapshot};
use tmon_utils::units::Direction;
use tracing::debug;

/// Owns every ring buffer and counter. There is exactly one writer (the
/// capture thread), so nothing in here is atomic or locked.
pub(crate) struct WindowAggregator {
    ring: [GlobalSecondStat; WINDOW_SECONDS],
    current: usize,
    total_bytes: u64,
    /// Running maximum since capture start. Unlike the per-address peak,
    /// this one is never windowed.
    peak_bytes_per_second: u64,
    averages: RollingAverages,
    registry: AddressRegistry,
}

impl WindowAggregator {
    pub(crate) fn new(max_addresses: usize) -> Self {
        Self {
            ring: [GlobalSecondStat::default(); WINDOW_SECONDS],
            current: 0,
            total_bytes: 0,
            peak_bytes_per_second: 0,
            averages: RollingAverages::default(),
            registry: AddressRegistry::new(max_addresses),
        }
    }

    pub(crate) fn lookup_or_create(&mut self, address: &str) -> AddressLookup {
        self.registry.lookup_or_create(address)
    }

    /// Account one frame: once globally, as "send" for its source and as
    /// "recv" for its destination.
    pub(crate) fn record_frame(&mut self, src: AddressLookup, dst: AddressLookup, wire_len: u32) {
        let wire_len = u64::from(wire_len);
        let slot = &mut self.ring[self.current];
        slot.bytes = slot.bytes.saturating_add(wire_len);
        slot.packets = slot.packets.saturating_add(1);
        self.total_bytes = self.total_bytes.saturating_add(wire_len);

        self.record_address(src, Direction::Send, wire_len);
        self.record_address(dst, Direction::Recv, wire_len);

        self.peak_bytes_per_second = u64::max(self.peak_bytes_per_second, self.ring[self.current].bytes);
    }

    fn record_address(&mut self, lookup: AddressLookup, direction: Direction, wire_len: u64) {
        if let AddressLookup::Tracked(handle) = lookup {
            self.registry
                .get_mut(handle)
                .stats
                .dir_mut(direction)
                .record(wire_len);
        }
    }

    /// Push every address's closing second into its history ring and
    /// refresh the windowed peaks.
    pub(crate) fn rotate_second(&mut self) {
        self.registry
            .iter_mut()
            .for_each(|entry| entry.stats.for_each_mut(|stat| stat.rotate()));
    }

    /// Compute the 2/10/40 second averages ending at the current slot and
    /// copy them onto every tracked address.
    ///
    /// During warm-up (`elapsed` below the window) the sum is divided by
    /// the elapsed wall-clock seconds, afterwards by the window length.
    pub(crate) fn compute_averages(&mut self, elapsed: u64) {
        let averages = RollingAverages {
            avg2: self.window_average(AVERAGE_WINDOWS[0], elapsed),
            avg10: self.window_average(AVERAGE_WINDOWS[1], elapsed),
            avg40: self.window_average(AVERAGE_WINDOWS[2], elapsed),
        };
        self.averages = averages;
        self.registry
            .iter_mut()
            .for_each(|entry| entry.stats.for_each_mut(|stat| stat.averages = averages));
    }

    fn window_average(&self, window: usize, elapsed: u64) -> f32 {
        let samples = usize::min(window, WINDOW_SECONDS);
        let sum: u64 = (0..samples)
            .map(|i| self.ring[(self.current + WINDOW_SECONDS - i) % WINDOW_SECONDS].bytes)
            .sum();
        if elapsed == 0 {
            0.0
        } else if elapsed < window as u64 {
            sum as f32 / elapsed as f32
        } else {
            sum as f32 / window as f32
        }
    }

    /// Build a snapshot of the current state. Does not mutate anything,
    /// so repeated calls yield identical snapshots.
    pub(crate) fn build_snapshot(&self) -> StatsSnapshot {
        let global = GlobalUpdate {
            total: self.total_bytes,
            peak: self.peak_bytes_per_second,
            avg2: self.averages.avg2,
            avg10: self.averages.avg10,
            avg40: self.averages.avg40,
        };

        let mut addresses = Vec::new();
        for entry in self.registry.iter() {
            for (direction, stat) in entry.stats.iter() {
                if stat.total_bytes == 0 {
                    continue;
                }
                addresses.push(AddressUpdate {
                    ip: entry.address.clone(),
                    direction,
                    total: stat.total_bytes,
                    peak: stat.peak_bytes_per_second,
                    avg2: stat.averages.avg2,
                    avg10: stat.averages.avg10,
                    avg40: stat.averages.avg40,
                });
            }
        }

        StatsSnapshot { global, addresses }
    }

    fn reset_address_seconds(&mut self) {
        self.registry
            .iter_mut()
            .for_each(|entry| entry.stats.for_each_mut(|stat| stat.reset_second()));
    }

    fn open_next_second(&mut self) {
        self.current = (self.current + 1) % WINDOW_SECONDS;
        self.ring[self.current] = GlobalSecondStat::default();
    }

    /// Everything that happens at a second boundary: rotate the address
    /// rings, compute averages over the closed second, snapshot, zero the
    /// per-address second counters, then open the next global slot.
    pub(crate) fn close_second(&mut self, elapsed: u64) -> StatsSnapshot {
        let closed = self.ring[self.current];
        // Averages cover the window ending at the closed slot, so the global
        // cursor only advances after the snapshot is built.
        self.rotate_second();
        self.compute_averages(elapsed);
        let snapshot = self.build_snapshot();
        if tracing::enabled!(tracing::Level::DEBUG) {
            let sent_by_tracked = self.packets_sent_by_tracked();
            debug!(
                "Second closed: {} bytes, {} packets ({} sent by tracked addresses), {} addresses tracked",
                closed.bytes,
                closed.packets,
                sent_by_tracked,
                self.registry.len()
            );
        }
        self.reset_address_seconds();
        self.open_next_second();
        snapshot
    }

    /// Frames in the current second whose source is a tracked address.
    /// Frames between two tracked addresses count once.
    fn packets_sent_by_tracked(&self) -> u64 {
        self.registry
            .iter()
            .map(|entry| entry.stats.send.packets_this_second)
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn current_second(&self) -> GlobalSecondStat {
        self.ring[self.current]
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &AddressRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(agg: &mut WindowAggregator, address: &str) -> AddressLookup {
        let lookup = agg.lookup_or_create(address);
        assert!(matches!(lookup, AddressLookup::Tracked(_)));
        lookup
    }

    #[test]
    fn second_bytes_equal_sum_of_frames() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        for len in [60, 1500, 576, 40] {
            agg.record_frame(a, b, len);
        }
        assert_eq!(agg.current_second().bytes, 2176);
        assert_eq!(agg.current_second().packets, 4);
    }

    #[test]
    fn partial_window_divides_by_elapsed() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        agg.record_frame(a, b, 100);
        agg.record_frame(a, b, 200);
        let snapshot = agg.close_second(1);
        assert_eq!(snapshot.global.avg2, 300.0);
        assert_eq!(snapshot.global.avg10, 300.0);
        assert_eq!(snapshot.global.avg40, 300.0);
    }

    #[test]
    fn full_window_divides_by_window() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        let mut snapshot = None;
        for elapsed in 1..=100 {
            agg.record_frame(a, b, 50);
            snapshot = Some(agg.close_second(elapsed));
        }
        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.global.avg2, 50.0);
        assert_eq!(snapshot.global.avg10, 50.0);
        assert_eq!(snapshot.global.avg40, 50.0);
    }

    #[test]
    fn zero_elapsed_gives_zero_averages() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        agg.record_frame(a, AddressLookup::NotTracked, 500);
        let snapshot = agg.close_second(0);
        assert_eq!(snapshot.global.avg2, 0.0);
        assert_eq!(snapshot.global.total, 500);
    }

    #[test]
    fn per_address_averages_equal_global() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        let c = tracked(&mut agg, "C");
        agg.record_frame(a, b, 1000);
        agg.record_frame(c, a, 10);
        let snapshot = agg.close_second(3);
        assert!(!snapshot.addresses.is_empty());
        for entry in &snapshot.addresses {
            assert_eq!(entry.avg2, snapshot.global.avg2);
            assert_eq!(entry.avg10, snapshot.global.avg10);
            assert_eq!(entry.avg40, snapshot.global.avg40);
        }
    }

    #[test]
    fn global_peak_is_never_windowed() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        agg.record_frame(a, b, 5_000);
        agg.close_second(1);
        for elapsed in 2..(WINDOW_SECONDS as u64 + 10) {
            agg.record_frame(a, b, 10);
            agg.close_second(elapsed);
        }
        let snapshot = agg.build_snapshot();
        assert_eq!(snapshot.global.peak, 5_000);
        // The per-address peak forgot the burst long ago.
        assert_eq!(snapshot.addresses[0].peak, 10);
    }

    #[test]
    fn peak_evicted_after_window_plus_one_boundaries() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        // A quiet second, then a burst, then steady traffic.
        agg.record_frame(a, b, 1);
        agg.close_second(1);
        agg.record_frame(a, b, 9_000);
        agg.close_second(2);
        for elapsed in 3..=(WINDOW_SECONDS as u64 + 1) {
            agg.record_frame(a, b, 100);
            let snapshot = agg.close_second(elapsed);
            assert_eq!(snapshot.addresses[0].peak, 9_000);
        }
        agg.record_frame(a, b, 100);
        let snapshot = agg.close_second(WINDOW_SECONDS as u64 + 2);
        assert_eq!(snapshot.addresses[0].peak, 100);
    }

    #[test]
    fn untracked_address_still_counts_globally() {
        let mut agg = WindowAggregator::new(2);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        let c = agg.lookup_or_create("C");
        assert_eq!(c, AddressLookup::NotTracked);
        agg.record_frame(a, b, 100);
        agg.record_frame(c, a, 250);
        let snapshot = agg.close_second(1);
        assert_eq!(snapshot.global.total, 350);
        assert!(snapshot.addresses.iter().all(|e| e.ip != "C"));
        let a_recv = snapshot
            .addresses
            .iter()
            .find(|e| e.ip == "A" && e.direction == Direction::Recv)
            .unwrap();
        assert_eq!(a_recv.total, 250);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        agg.record_frame(a, b, 123);
        agg.close_second(1);
        agg.record_frame(b, a, 77);
        assert_eq!(agg.build_snapshot(), agg.build_snapshot());
    }

    #[test]
    fn snapshot_skips_zero_totals_and_orders_entries() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        let _idle = tracked(&mut agg, "C");
        agg.record_frame(a, b, 10);
        agg.record_frame(b, a, 20);
        let snapshot = agg.close_second(1);
        let order: Vec<(&str, Direction)> = snapshot
            .addresses
            .iter()
            .map(|e| (e.ip.as_str(), e.direction))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", Direction::Send),
                ("A", Direction::Recv),
                ("B", Direction::Send),
                ("B", Direction::Recv),
            ]
        );
    }

    #[test]
    fn boundary_zeroes_address_second_counters_and_opens_new_slot() {
        let mut agg = WindowAggregator::new(10);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        agg.record_frame(a, b, 400);
        agg.close_second(1);
        assert_eq!(agg.current_second(), GlobalSecondStat::default());
        for entry in agg.registry().iter() {
            assert_eq!(entry.stats.send.bytes_this_second, 0);
            assert_eq!(entry.stats.recv.bytes_this_second, 0);
        }
    }

    #[test]
    fn tracked_packet_count_follows_the_source() {
        let mut agg = WindowAggregator::new(2);
        let a = tracked(&mut agg, "A");
        let b = tracked(&mut agg, "B");
        let outsider = agg.lookup_or_create("C");
        assert_eq!(outsider, AddressLookup::NotTracked);
        agg.record_frame(a, b, 100);
        agg.record_frame(b, a, 100);
        agg.record_frame(outsider, a, 100);
        assert_eq!(agg.current_second().packets, 3);
        assert_eq!(agg.packets_sent_by_tracked(), 2);
        agg.close_second(1);
        assert_eq!(agg.packets_sent_by_tracked(), 0);
    }
}
