//! Retention policy: what to delete, from where, and when a file counts
//! as old.
//!
//! The policy is immutable for the daemon's lifetime; changing it requires
//! a restart.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use glob::Pattern;

use crate::error::{Result, SweepError};

pub const DEFAULT_RETENTION_DAYS: u32 = 15;
pub const DEFAULT_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_FILE_PATTERN: &str = "*.log";

/// Filesystem-recovery directories are protected by default so a salvage
/// area is never pruned by accident.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["lost+found"];

#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub root: PathBuf,
    pub max_age_days: u32,
    pub file_pattern: Pattern,
    pub excluded_dir_names: HashSet<String>,
}

impl RetentionPolicy {
    /// Builds a policy, validating the glob pattern. An empty exclusion
    /// list falls back to [`DEFAULT_EXCLUDED_DIRS`].
    pub fn new(
        root: PathBuf,
        max_age_days: u32,
        file_pattern: &str,
        excluded_dir_names: &[String],
    ) -> Result<Self> {
        let file_pattern = Pattern::new(file_pattern)
            .map_err(|err| SweepError::Config(format!("bad file pattern {file_pattern:?}: {err}")))?;

        let excluded_dir_names: HashSet<String> = if excluded_dir_names.is_empty() {
            DEFAULT_EXCLUDED_DIRS.iter().map(|s| (*s).to_string()).collect()
        } else {
            excluded_dir_names.iter().cloned().collect()
        };

        Ok(Self {
            root,
            max_age_days,
            file_pattern,
            excluded_dir_names,
        })
    }

    /// Startup check: the root must exist and be a directory, otherwise the
    /// process refuses to start. A root that vanishes later only skips
    /// individual ticks.
    pub fn validate_root(&self) -> Result<()> {
        let meta = std::fs::metadata(&self.root).map_err(|err| {
            SweepError::Config(format!(
                "root directory {} unreachable: {err}",
                self.root.display()
            ))
        })?;
        if !meta.is_dir() {
            return Err(SweepError::Config(format!(
                "root {} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// True when a file last modified at `mtime` is strictly older than the
    /// retention threshold as of `now`.
    ///
    /// The boundary is exclusive: a file exactly `max_age_days` old is
    /// retained; one second older is deleted. Ages are exact time
    /// differences in UTC, not calendar-day truncations.
    #[must_use]
    pub fn is_expired(&self, mtime: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - mtime > Duration::days(i64::from(self.max_age_days))
    }

    /// True when `file_name` matches the configured glob.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.file_pattern.matches(file_name)
    }

    /// True when a directory with this name (and everything beneath it)
    /// must never be inspected or deleted.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.excluded_dir_names.contains(name))
    }
}

/// Default sweep root: `<home>/logs`, where `home` falls back to the
/// platform data directory when not configured.
pub fn default_root(home: Option<&Path>) -> Result<PathBuf> {
    if let Some(home) = home {
        return Ok(home.join("logs"));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| SweepError::Config("data directory not found".to_string()))?;
    Ok(data_dir.join("logsweep/logs"))
}
