// A simple module to define the time types used in the project
//
// The functions here use SystemTime::now() which is NON-DETERMINISTIC.
// Entry points on GovernorState take the current time explicitly so that
// callers (and tests) control it; only the locking Governor wrapper stamps
// live calls with wall-clock time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Seconds timestamps used to determine it using its type
pub type TimestampSeconds = u64;

#[inline]
pub fn get_current_time() -> Duration {
    let start = SystemTime::now();

    start
        .duration_since(UNIX_EPOCH)
        .expect("Incorrect time returned from get_current_time")
}

// Return timestamp in seconds
pub fn get_current_time_in_seconds() -> TimestampSeconds {
    get_current_time().as_secs()
}
