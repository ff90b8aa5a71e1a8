use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::error;

/// Retrieves the current time, in seconds since the UNIX epoch.
/// Otherwise known as "unix time".
///
/// It can fail if the clock isn't ready.
pub fn unix_now() -> Result<u64, TimeError> {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(t) => Ok(t.as_secs()),
        Err(e) => {
            error!("Error determining the time in UNIX land: {:?}", e);
            Err(TimeError::ClockNotReady)
        }
    }
}

/// Seconds elapsed between `start` and `now`, both in unix seconds.
/// A clock that stepped backwards yields zero rather than wrapping.
pub fn seconds_between(start: u64, now: u64) -> u64 {
    now.saturating_sub(start)
}

/// Error type for time functions.
#[derive(Error, Debug)]
pub enum TimeError {
    /// The clock isn't ready yet.
    #[error("Clock not ready")]
    ClockNotReady,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_2020() {
        let now = unix_now().unwrap();
        assert!(now > 1_577_836_800);
    }

    #[test]
    fn backwards_clock_is_zero() {
        assert_eq!(seconds_between(100, 90), 0);
        assert_eq!(seconds_between(100, 140), 40);
    }
}
