use crate::time::TimestampSeconds;

// Mandatory delay between scheduling an operation and its earliest execution.
// An operation scheduled at `t` becomes executable at `t + TIMELOCK_DELAY`
// (boundary inclusive).
pub const TIMELOCK_DELAY: TimestampSeconds = 2 * 24 * 3600;

// Minimum spacing enforced between successive operator-gated calls
// (schedule and execute share a single global cursor).
pub const OPERATOR_COOLDOWN: TimestampSeconds = 3600;
