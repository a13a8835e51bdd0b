//! Filesystem fixture for sweep tests.
//!
//! File ages are controlled by back-dating mtimes relative to a fixed
//! reference instant captured at fixture creation, so tests never sleep
//! and never depend on wall-clock drift. The reference instant is
//! truncated to whole seconds to sidestep filesystem timestamp
//! resolution differences.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tempfile::TempDir;

use crate::policy::RetentionPolicy;

/// Isolated directory tree plus the instant sweeps should be evaluated at.
pub struct SweepFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    /// Reference "now" for age classification; pass this to `sweep_once`.
    pub now: DateTime<Utc>,
}

impl Default for SweepFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("logs");
        fs::create_dir_all(&root).expect("create root");

        Self {
            temp_dir,
            root,
            now: Utc::now().trunc_subsecs(0),
        }
    }

    /// Create a file under the root whose mtime is `age` before the
    /// fixture's reference instant. Parent directories are created as
    /// needed.
    pub fn create_aged(&self, relative: &str, age: Duration) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, b"log line\n").expect("write file");

        let mtime = self.now - age;
        let file = fs::File::options()
            .write(true)
            .open(&path)
            .expect("open for mtime update");
        file.set_modified(SystemTime::from(mtime))
            .expect("set mtime");

        path
    }

    /// Create a file whose age is a whole number of days.
    pub fn create_aged_days(&self, relative: &str, days: i64) -> PathBuf {
        self.create_aged(relative, Duration::days(days))
    }

    /// Policy rooted at this fixture with the given retention and pattern
    /// and default exclusions.
    #[must_use]
    pub fn policy(&self, max_age_days: u32, pattern: &str) -> RetentionPolicy {
        RetentionPolicy::new(self.root.clone(), max_age_days, pattern, &[])
            .expect("valid test policy")
    }
}
