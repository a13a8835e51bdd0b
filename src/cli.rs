//! Command-line and environment surface.
//!
//! Every knob has a flag and an environment variable; there is no config
//! file. Policy changes require a restart.

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::{Result, SweepError};
use crate::policy::{
    DEFAULT_FILE_PATTERN, DEFAULT_INTERVAL_SECS, DEFAULT_RETENTION_DAYS, RetentionPolicy,
    default_root,
};

#[derive(Parser, Debug)]
#[command(
    name = "logsweep",
    version,
    about = "Periodic, bounded, age-based log-retention daemon",
    long_about = "Walks a directory tree on a fixed, epoch-aligned cadence and deletes \
                  files matching a glob pattern that are older than the retention \
                  threshold. Excluded directory subtrees are never inspected."
)]
pub struct Cli {
    /// Directory tree to sweep [default: <home>/logs]
    #[arg(long, env = "LOGSWEEP_ROOT")]
    pub root: Option<PathBuf>,

    /// Application home used to derive the default root
    #[arg(long, env = "LOGSWEEP_HOME")]
    pub home: Option<PathBuf>,

    /// Delete files strictly older than this many days
    #[arg(long, env = "LOGSWEEP_RETENTION_DAYS", default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Seconds between sweeps; ticks align to epoch boundaries
    #[arg(long, env = "LOGSWEEP_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Glob matched against file names
    #[arg(long, env = "LOGSWEEP_PATTERN", default_value = DEFAULT_FILE_PATTERN)]
    pub pattern: String,

    /// Directory names whose subtrees are never inspected [default: lost+found]
    #[arg(long = "exclude-dir", env = "LOGSWEEP_EXCLUDE_DIR", value_delimiter = ',')]
    pub exclude_dirs: Vec<String>,

    /// Run a single sweep and exit instead of looping
    #[arg(long)]
    pub once: bool,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Machine-readable JSON output
    #[arg(long, env = "LOGSWEEP_ROBOT")]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Builds the retention policy, surfacing any configuration problem as
    /// a fatal startup error.
    pub fn policy(&self) -> Result<RetentionPolicy> {
        if self.interval_secs == 0 {
            return Err(SweepError::Config(
                "sweep interval must be at least 1 second".to_string(),
            ));
        }

        let root = match &self.root {
            Some(root) => root.clone(),
            None => default_root(self.home.as_deref())?,
        };

        RetentionPolicy::new(root, self.retention_days, &self.pattern, &self.exclude_dirs)
    }
}
