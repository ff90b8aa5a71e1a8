use super::WINDOW_SECONDS;

/// Bytes and packets counted in one elapsed second, across all traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GlobalSecondStat {
    pub(crate) bytes: u64,
    pub(crate) packets: u64,
}

/// Trailing-window averages, in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RollingAverages {
    pub(crate) avg2: f32,
    pub(crate) avg10: f32,
    pub(crate) avg40: f32,
}

/// Statistics for one address in one direction.
#[derive(Debug, Clone)]
pub(crate) struct AddressDirectionStat {
    pub(crate) bytes_this_second: u64,
    pub(crate) packets_this_second: u64,
    pub(crate) total_bytes: u64,
    /// Max of `history`, refreshed on every rotation.
    pub(crate) peak_bytes_per_second: u64,
    pub(crate) averages: RollingAverages,
    history: [u64; WINDOW_SECONDS],
    /// `None` until the first rotation, which writes slot 0.
    cursor: Option<usize>,
}

impl Default for AddressDirectionStat {
    fn default() -> Self {
        Self {
            bytes_this_second: 0,
            packets_this_second: 0,
            total_bytes: 0,
            peak_bytes_per_second: 0,
            averages: RollingAverages::default(),
            history: [0; WINDOW_SECONDS],
            cursor: None,
        }
    }
}

impl AddressDirectionStat {
    pub(crate) fn record(&mut self, wire_len: u64) {
        self.bytes_this_second = self.bytes_this_second.saturating_add(wire_len);
        self.packets_this_second = self.packets_this_second.saturating_add(1);
        self.total_bytes = self.total_bytes.saturating_add(wire_len);
    }

    /// Push the closing second into the history ring, overwriting the
    /// oldest entry, and rescan the whole ring for the peak.
    pub(crate) fn rotate(&mut self) {
        let next = match self.cursor {
            None => 0,
            Some(cursor) => (cursor + 1) % WINDOW_SECONDS,
        };
        self.cursor = Some(next);
        self.history[next] = self.bytes_this_second;
        self.peak_bytes_per_second = self.history.iter().copied().max().unwrap_or(0);
    }

    pub(crate) fn reset_second(&mut self) {
        self.bytes_this_second = 0;
        self.packets_this_second = 0;
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
