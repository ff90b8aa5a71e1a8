//! Ships traffic statistics to a remote collector over HTTP.
//!
//! Reporting is best-effort: submissions go into a bounded queue that
//! never blocks the caller, and a background thread posts them as JSON.
//! Responses are ignored and failures are only counted.

#![warn(missing_docs)]

mod sink;
mod submission_queue;

/// Message shapes accepted by the collector.
pub mod transport_data;

pub use sink::ReportSink;
pub use submission_queue::{ReportCounters, ReportSender, Reporter, ReporterError, Submission};
