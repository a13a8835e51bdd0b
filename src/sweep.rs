//! One pass over the tree: classify and delete expired files.

use std::fs;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SweepError};
use crate::policy::RetentionPolicy;

/// Counters from one sweep.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SweepReport {
    /// File entries inspected (after exclusion pruning).
    pub scanned: u64,
    /// Files deleted, or that would be deleted in dry-run mode.
    pub deleted: u64,
    /// Per-file failures that were logged and skipped.
    pub errors: u64,
    /// Sweep was abandoned early because shutdown was requested.
    pub interrupted: bool,
}

/// Sweeps the tree once, deleting every file that matches the policy's
/// pattern and is strictly older than its retention threshold at `now`.
///
/// Deterministic with respect to the filesystem and `now`: the same tree at
/// the same instant yields the same deletion set. Directories are never
/// removed. Per-file failures are counted, not propagated; only an
/// unreachable root aborts the sweep, as [`SweepError::RootUnreachable`].
///
/// `stop` is observed between file operations: once set, no new deletion
/// starts, and the report is returned with `interrupted` set.
pub fn sweep_once(
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
    dry_run: bool,
    stop: &AtomicBool,
) -> Result<SweepReport> {
    // Probe the root up front so a vanished mount skips the whole tick
    // instead of surfacing as a storm of per-entry errors.
    let root_meta = fs::metadata(&policy.root).map_err(|source| SweepError::RootUnreachable {
        root: policy.root.clone(),
        source,
    })?;
    if !root_meta.is_dir() {
        return Err(SweepError::RootUnreachable {
            root: policy.root.clone(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let mut report = SweepReport::default();

    let walker = WalkDir::new(&policy.root)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir() && policy.is_excluded_dir(entry.file_name()))
        });

    for entry in walker {
        if stop.load(Ordering::Relaxed) {
            debug!("shutdown requested, abandoning sweep");
            report.interrupted = true;
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "unreadable entry, skipping");
                report.errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        report.scanned += 1;

        let name = entry.file_name().to_string_lossy();
        if !policy.matches(&name) {
            continue;
        }

        let mtime = match entry.metadata().map_err(io::Error::from).and_then(|m| m.modified()) {
            Ok(mtime) => DateTime::<Utc>::from(mtime),
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "cannot read mtime, skipping");
                report.errors += 1;
                continue;
            }
        };
        if !policy.is_expired(mtime, now) {
            continue;
        }

        if dry_run {
            debug!(path = %entry.path().display(), "would delete");
            report.deleted += 1;
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(path = %entry.path().display(), "deleted");
                report.deleted += 1;
            }
            // Already gone: a concurrent sweeper got there first. Not an
            // error, which keeps overlapping instances race-safe.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "delete failed");
                report.errors += 1;
            }
        }
    }

    Ok(report)
}
