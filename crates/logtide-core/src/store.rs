//! In-memory, time-indexed log storage partitioned by service name.
//!
//! This module provides:
//! - [`LogStore`] — Thread-safe store supporting append, range query and expiration
//! - [`SharedLogStore`] — The handle passed to request handlers and the sweeper
//! - Implementation of [`LogStoreTrait`] for generic usage
//!
//! Every operation takes a single store-wide [`RwLock`]. Appends and
//! expiration are writers; range queries are readers and may run in parallel.
//! Entries are kept in arrival order and sorted at query time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::LogStoreTrait;
use crate::types::{LogEntry, TimeRange};

/// Thread-safe in-memory log store keyed by service name.
///
/// Invariant: every service present in the map has at least one entry.
#[derive(Debug, Default)]
pub struct LogStore {
    services: RwLock<HashMap<String, Vec<LogEntry>>>,
}

impl LogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `service`, creating the service on first use.
    ///
    /// Timestamps may arrive out of order; they are stored as received.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyServiceName`] if `service` is empty.
    pub fn append(
        &self,
        service: &str,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Result<()> {
        if service.is_empty() {
            return Err(StoreError::EmptyServiceName);
        }

        let entry = LogEntry::new(timestamp, message);

        let mut services = self.services.write();
        let entries = services.entry(service.to_owned()).or_default();
        entries.push(entry);
        let len = entries.len();
        drop(services);

        debug!(service, %timestamp, entries = len, "appended log entry");
        Ok(())
    }

    /// Returns entries for `service` with `start <= timestamp <= end`,
    /// sorted ascending by timestamp.
    ///
    /// Entries with equal timestamps keep their arrival order. An unknown
    /// service yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRange`] if `start` is after `end`.
    pub fn range_query(
        &self,
        service: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>> {
        let range = TimeRange::new(start, end)?;
        Ok(self.query(service, range))
    }

    /// Same as [`range_query`](Self::range_query) for an already validated range.
    #[must_use]
    pub fn query(&self, service: &str, range: TimeRange) -> Vec<LogEntry> {
        let mut matched: Vec<LogEntry> = {
            let services = self.services.read();
            services.get(service).map_or_else(Vec::new, |entries| {
                entries
                    .iter()
                    .filter(|e| range.contains(e.timestamp))
                    .cloned()
                    .collect()
            })
        };

        // Stable sort keeps arrival order among equal timestamps.
        matched.sort_by_key(|e| e.timestamp);
        matched
    }

    /// Removes every entry older than `cutoff` and prunes services left empty.
    ///
    /// Returns the number of entries removed. The whole pass runs under one
    /// write lock so no reader sees a half-pruned service.
    pub fn expire(&self, cutoff: DateTime<Utc>) -> usize {
        let mut services = self.services.write();
        let mut removed = 0;

        services.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.timestamp >= cutoff);
            removed += before - entries.len();
            !entries.is_empty()
        });
        let remaining = services.len();
        drop(services);

        if removed > 0 {
            debug!(%cutoff, removed, services = remaining, "expired log entries");
        }
        removed
    }

    /// Returns the total number of stored entries across all services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.read().values().map(Vec::len).sum()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    /// Returns the number of known services.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.read().len()
    }

    /// Returns service and entry counts read under a single lock.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let services = self.services.read();
        StoreStats {
            services: services.len(),
            entries: services.values().map(Vec::len).sum(),
        }
    }

    /// Returns the number of entries stored for `service`.
    ///
    /// Returns 0 if the service is unknown.
    #[must_use]
    pub fn service_len(&self, service: &str) -> usize {
        self.services.read().get(service).map_or(0, Vec::len)
    }

    /// Returns the names of all known services, sorted.
    #[must_use]
    pub fn services(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

/// Point-in-time size of a [`LogStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Number of services holding at least one entry.
    pub services: usize,
    /// Total entries across all services.
    pub entries: usize,
}

/// Shared log store handle.
pub type SharedLogStore = Arc<LogStore>;

/// Creates a new shared log store.
#[must_use]
pub fn shared_store() -> SharedLogStore {
    Arc::new(LogStore::new())
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl LogStoreTrait for LogStore {
    fn append(&self, service: &str, timestamp: DateTime<Utc>, message: String) -> Result<()> {
        LogStore::append(self, service, timestamp, message)
    }

    fn range_query(
        &self,
        service: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>> {
        LogStore::range_query(self, service, start, end)
    }

    fn expire(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        Ok(LogStore::expire(self, cutoff))
    }
}
