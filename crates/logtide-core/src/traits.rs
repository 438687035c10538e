//! Traits for log storage backends.
//!
//! The [`LogStoreTrait`] trait is the seam between the store and its callers:
//! request handlers append and query through it, and the
//! [`RetentionSweeper`](crate::sweeper::RetentionSweeper) expires through it.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::LogEntry;

/// Trait for log storage backends.
///
/// Implementations must be safe to share between request handlers and the
/// background sweeper.
pub trait LogStoreTrait: Send + Sync {
    /// Appends a message for `service`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot accept the entry.
    fn append(&self, service: &str, timestamp: DateTime<Utc>, message: String) -> Result<()>;

    /// Returns entries for `service` within `start..=end`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid.
    fn range_query(
        &self,
        service: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>>;

    /// Removes entries older than `cutoff` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass could not run. The store must stay usable.
    fn expire(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use chrono::TimeZone;
    use parking_lot::Mutex;

    /// A minimal backend that records calls.
    #[derive(Default)]
    struct RecordingStore {
        cutoffs: Mutex<Vec<DateTime<Utc>>>,
    }

    impl LogStoreTrait for RecordingStore {
        fn append(&self, service: &str, _timestamp: DateTime<Utc>, _message: String) -> Result<()> {
            if service.is_empty() {
                return Err(StoreError::EmptyServiceName);
            }
            Ok(())
        }

        fn range_query(
            &self,
            _service: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<LogEntry>> {
            Ok(Vec::new())
        }

        fn expire(&self, cutoff: DateTime<Utc>) -> Result<usize> {
            self.cutoffs.lock().push(cutoff);
            Ok(0)
        }
    }

    #[test]
    fn custom_backend_is_object_safe() {
        let store: Box<dyn LogStoreTrait> = Box::new(RecordingStore::default());
        let now = Utc.with_ymd_and_hms(2025, 3, 17, 10, 0, 0).unwrap();

        assert!(store.append("auth", now, "x".to_string()).is_ok());
        assert!(store.append("", now, "x".to_string()).is_err());
        assert!(store.range_query("auth", now, now).unwrap().is_empty());
        assert_eq!(store.expire(now).unwrap(), 0);
    }

    #[test]
    fn expire_receives_cutoff() {
        let store = RecordingStore::default();
        let cutoff = Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap();

        store.expire(cutoff).unwrap();

        assert_eq!(*store.cutoffs.lock(), vec![cutoff]);
    }
}
