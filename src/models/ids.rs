//! Record id generation
//!
//! Ids have the form `<prefix>-<unix-millis>`. The millisecond component
//! never repeats within a process and skips values already taken in the
//! metadata store, so two backups started in the same millisecond still get
//! distinct ids. The value can run ahead of the wall clock and is never used
//! as a record's timestamp.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Monotonic source of millisecond id components
#[derive(Debug, Default)]
pub struct IdClock {
    last: Mutex<i64>,
}

impl IdClock {
    /// Create a new clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Next millisecond value at or after `now`, skipping values for which `taken` is true
    pub fn next_millis(&self, now: DateTime<Utc>, taken: impl Fn(i64) -> bool) -> i64 {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut millis = now.timestamp_millis().max(*last + 1);
        while taken(millis) {
            millis += 1;
        }
        *last = millis;
        millis
    }
}

/// Format a record id
pub fn record_id(prefix: &str, millis: i64) -> String {
    format!("{}-{}", prefix, millis)
}
