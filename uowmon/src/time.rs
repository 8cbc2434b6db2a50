//! Time helpers.
//!
//! Timestamps throughout the system (UOW history lines, ledger entries)
//! are seconds since the Unix epoch, with no timezone entanglement.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as whole seconds since the Unix epoch.
///
/// Returns 0 if the system clock reports a time before the epoch, which
/// keeps callers infallible at the cost of a nonsensical-but-harmless
/// timestamp on a badly misconfigured host.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
