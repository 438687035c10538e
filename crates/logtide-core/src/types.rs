//! Core types for the log store.
//!
//! This module provides:
//! - [`LogEntry`] — An immutable timestamped message
//! - [`TimeRange`] — An inclusive, validated query window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A single log message anchored to an instant in UTC.
///
/// Entries are created on ingest and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the message was produced, as reported by the client.
    pub timestamp: DateTime<Utc>,
    /// The message text. May be empty.
    pub message: String,
}

impl LogEntry {
    /// Creates a new log entry.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

/// A time window with both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range that covers every representable instant.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Start of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if `ts` falls within the range.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 17, h, m, s).unwrap()
    }

    #[test]
    fn entry_new_accepts_str_and_string() {
        let a = LogEntry::new(at(10, 0, 0), "hello");
        let b = LogEntry::new(at(10, 0, 0), String::from("hello"));
        assert_eq!(a, b);
    }

    #[test]
    fn entry_allows_empty_message() {
        let entry = LogEntry::new(at(10, 0, 0), "");
        assert!(entry.message.is_empty());
    }

    #[test]
    fn entry_serializes_timestamp_as_rfc3339() {
        let entry = LogEntry::new(at(10, 5, 0), "attempt");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], "2025-03-17T10:05:00Z");
        assert_eq!(json["message"], "attempt");
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let result = TimeRange::new(at(10, 30, 0), at(10, 0, 0));
        assert!(matches!(result, Err(StoreError::InvalidRange { .. })));
    }

    #[test]
    fn range_allows_single_instant() {
        let range = TimeRange::new(at(10, 0, 0), at(10, 0, 0)).unwrap();
        assert!(range.contains(at(10, 0, 0)));
        assert!(!range.contains(at(10, 0, 1)));
    }

    #[test_case(at(10, 0, 0), true ; "exactly at start")]
    #[test_case(at(10, 30, 0), true ; "exactly at end")]
    #[test_case(at(10, 15, 0), true ; "inside")]
    #[test_case(at(10, 0, 0) - Duration::nanoseconds(1), false ; "one tick before start")]
    #[test_case(at(10, 30, 0) + Duration::nanoseconds(1), false ; "one tick after end")]
    fn range_contains_is_inclusive(ts: DateTime<Utc>, expected: bool) {
        let range = TimeRange::new(at(10, 0, 0), at(10, 30, 0)).unwrap();
        assert_eq!(range.contains(ts), expected);
    }

    #[test]
    fn all_range_covers_extremes() {
        let range = TimeRange::all();
        assert!(range.contains(DateTime::<Utc>::MIN_UTC));
        assert!(range.contains(DateTime::<Utc>::MAX_UTC));
        assert!(range.contains(at(10, 0, 0)));
    }
}
