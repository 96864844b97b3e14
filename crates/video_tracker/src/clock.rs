//! Time source abstraction.
//!
//! The repository and the refresh engine take their timestamps from a
//! `Clock` so staleness decisions can run on synthetic time in tests.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time, seconds since epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time as seconds since the Unix epoch.
    fn now_unix(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs() as i64)
    }
}
