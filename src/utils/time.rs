//! Deadline arithmetic for bounded waits

use std::time::{Duration, Instant};

/// Longest wait a deadline can describe
pub const MAX_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Instant `timeout` from now, capped at [`MAX_WAIT`]
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(MAX_WAIT)).unwrap_or(now)
}
