use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};

use logsweep::SweepError;
use logsweep::policy::{DEFAULT_EXCLUDED_DIRS, RetentionPolicy};
use logsweep::test_utils::fixtures::SweepFixture;
use logsweep::test_utils::{TestCase, run_table_tests};

fn policy(pattern: &str) -> RetentionPolicy {
    RetentionPolicy::new(PathBuf::from("/var/log/app"), 15, pattern, &[]).expect("valid policy")
}

#[test]
fn pattern_matching_table() -> Result<(), String> {
    let policy = policy("*.log");
    let cases = vec![
        TestCase {
            name: "plain log file",
            input: "scheduler.log",
            expected: true,
        },
        TestCase {
            name: "rotated suffix does not match",
            input: "scheduler.log.1",
            expected: false,
        },
        TestCase {
            name: "other extension",
            input: "notes.txt",
            expected: false,
        },
        TestCase {
            name: "bare extension",
            input: ".log",
            expected: true,
        },
    ];
    run_table_tests(cases, |name| policy.matches(name))
}

#[test]
fn expiry_boundary_table() -> Result<(), String> {
    let policy = policy("*.log");
    let now = Utc.timestamp_opt(2_000_000_000, 0).unwrap();
    let threshold = Duration::days(15);

    let cases = vec![
        TestCase {
            name: "one second younger than threshold",
            input: now - threshold + Duration::seconds(1),
            expected: false,
        },
        TestCase {
            name: "exactly at threshold",
            input: now - threshold,
            expected: false,
        },
        TestCase {
            name: "one second older than threshold",
            input: now - threshold - Duration::seconds(1),
            expected: true,
        },
        TestCase {
            name: "brand new",
            input: now,
            expected: false,
        },
    ];
    run_table_tests(cases, |mtime| policy.is_expired(mtime, now))
}

#[test]
fn zero_retention_expires_anything_in_the_past() {
    let policy = RetentionPolicy::new(PathBuf::from("/var/log/app"), 0, "*.log", &[]).unwrap();
    let now = Utc.timestamp_opt(2_000_000_000, 0).unwrap();

    assert!(policy.is_expired(now - Duration::seconds(1), now));
    assert!(!policy.is_expired(now, now));
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let err = RetentionPolicy::new(PathBuf::from("/var/log/app"), 15, "[", &[]).unwrap_err();
    assert!(matches!(err, SweepError::Config(_)));
}

#[test]
fn default_exclusions_apply_when_none_given() {
    let policy = policy("*.log");
    for name in DEFAULT_EXCLUDED_DIRS {
        assert!(policy.is_excluded_dir(std::ffi::OsStr::new(name)));
    }
}

#[test]
fn custom_exclusions_replace_the_default() {
    let policy = RetentionPolicy::new(
        PathBuf::from("/var/log/app"),
        15,
        "*.log",
        &["archive".to_string()],
    )
    .unwrap();

    assert!(policy.is_excluded_dir(std::ffi::OsStr::new("archive")));
    assert!(!policy.is_excluded_dir(std::ffi::OsStr::new("lost+found")));
}

#[test]
fn validate_root_accepts_existing_directory() {
    let fx = SweepFixture::new();
    let policy = fx.policy(15, "*.log");
    policy.validate_root().expect("root exists");
}

#[test]
fn validate_root_rejects_missing_directory() {
    let fx = SweepFixture::new();
    let policy =
        RetentionPolicy::new(fx.root.join("missing"), 15, "*.log", &[]).unwrap();
    let err = policy.validate_root().unwrap_err();
    assert!(matches!(err, SweepError::Config(_)));
}

#[test]
fn validate_root_rejects_plain_file() {
    let fx = SweepFixture::new();
    let file = fx.create_aged_days("not-a-dir.log", 0);
    let policy = RetentionPolicy::new(file, 15, "*.log", &[]).unwrap();
    let err = policy.validate_root().unwrap_err();
    assert!(matches!(err, SweepError::Config(_)));
}
