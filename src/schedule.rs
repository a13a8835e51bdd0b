//! Epoch-aligned tick boundaries.
//!
//! Ticks land on multiples of the sweep interval counted from the Unix
//! epoch, not from process start. Restarting the daemon does not shift the
//! schedule's phase, and independent instances converge on the same
//! absolute boundaries.

use chrono::{DateTime, Duration, Utc};

/// Next tick boundary at or after `now`.
///
/// Returns `now` itself when it falls exactly on a boundary; otherwise the
/// smallest instant after `now` whose Unix timestamp is a multiple of
/// `period_secs`.
#[must_use]
pub fn next_tick(now: DateTime<Utc>, period_secs: u64) -> DateTime<Utc> {
    let period = i64::try_from(period_secs).unwrap_or(i64::MAX).max(1);
    let rem = now.timestamp().rem_euclid(period);
    let subsec = i64::from(now.timestamp_subsec_nanos());

    if rem == 0 && subsec == 0 {
        return now;
    }

    // Truncate to the whole second so the result lands exactly on the
    // boundary, then step forward by the remainder of the period.
    now - Duration::nanoseconds(subsec) + Duration::seconds(period - rem)
}

/// How long to sleep from `now` to reach `tick`. Zero if already past.
#[must_use]
pub fn sleep_duration(now: DateTime<Utc>, tick: DateTime<Utc>) -> std::time::Duration {
    (tick - now).to_std().unwrap_or(std::time::Duration::ZERO)
}
