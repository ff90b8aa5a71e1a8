//! Collection of utility functions shared by the `tmon` crates.

#![warn(missing_docs)]

/// Utilities for scaling bytes and packets to human-readable format
pub mod packet_scale;

/// Direction-keyed pairs of values (send/receive)
pub mod units;

/// Utilities dealing with Unix Timestamps
pub mod unix_time;
