use tmon_utils::unix_time::seconds_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TriggerState {
    WithinSecond,
    /// A new wall-clock second has started. Carries the whole seconds
    /// elapsed since capture start.
    AtBoundary { elapsed: u64 },
}

/// Detects wall-clock second boundaries from frame arrival times.
///
/// Detection is frame-driven: a second with no traffic produces no
/// boundary, and a jump across several seconds produces exactly one.
#[derive(Debug)]
pub(crate) struct EmissionTrigger {
    start_second: u64,
    last_second: u64,
}

impl EmissionTrigger {
    pub(crate) fn new(start_second: u64) -> Self {
        Self {
            start_second,
            last_second: start_second,
        }
    }

    pub(crate) fn observe(&mut self, frame_second: u64) -> TriggerState {
        if frame_second == self.last_second {
            return TriggerState::WithinSecond;
        }
        self.last_second = frame_second;
        TriggerState::AtBoundary {
            elapsed: seconds_between(self.start_second, frame_second),
        }
    }
}
