//! logsweep - periodic, bounded, age-based log-retention daemon.
//!
//! Enforces a retention policy against a directory tree on a fixed,
//! epoch-aligned cadence: files matching a glob pattern whose modification
//! time is older than the retention threshold are deleted; excluded
//! directory subtrees are never inspected.

pub mod cli;
pub mod clock;
pub mod daemon;
pub mod error;
pub mod policy;
pub mod schedule;
pub mod sweep;
pub mod test_utils;

pub use error::{Result, SweepError};
