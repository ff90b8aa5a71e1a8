//! Count classifier statistics

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

/// Frames handed to the classifier
pub static FRAMES_SEEN: AtomicU64 = AtomicU64::new(0);

/// Frames rejected for being shorter than a link + IPv4 header
pub static FRAMES_REJECTED: AtomicU64 = AtomicU64::new(0);

/// Frames classified successfully
pub static FRAMES_ACCEPTED: AtomicU64 = AtomicU64::new(0);

/// Snapshot of the counters as `(seen, accepted, rejected)`.
pub fn frame_counts() -> (u64, u64, u64) {
    (
        FRAMES_SEEN.load(Relaxed),
        FRAMES_ACCEPTED.load(Relaxed),
        FRAMES_REJECTED.load(Relaxed),
    )
}
