//! Time utilities with a clock abstraction for testability.
//!
//! Timestamps are Unix milliseconds. They are rendered in JST (UTC+9) for
//! human-facing output such as the presence API.

use chrono::{DateTime, FixedOffset};

const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Clock that always returns the same instant (for tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn jst() -> Option<FixedOffset> {
    FixedOffset::east_opt(JST_OFFSET_SECONDS)
}

/// Get the current Unix timestamp in milliseconds.
///
/// The instant is the same in every timezone; JST only matters when the
/// value is rendered with [`timestamp_to_jst_rfc3339`].
pub fn get_jst_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to an RFC 3339 string in JST.
///
/// Returns `None` if the timestamp is outside the range chrono can represent.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> Option<String> {
    let offset = jst()?;
    let utc = DateTime::from_timestamp_millis(timestamp_millis)?;
    Some(utc.with_timezone(&offset).to_rfc3339())
}
