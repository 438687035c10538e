//! # logtide-core
//!
//! In-memory, time-windowed log storage for logtide.
//!
//! This crate provides:
//!
//! - [`LogEntry`] — An immutable timestamped message
//! - [`TimeRange`] — Inclusive query window
//! - [`LogStore`] — Concurrent store partitioned by service name
//! - [`LogStoreTrait`] — Abstract trait for log backends
//! - [`RetentionSweeper`] — Background task that expires old entries
//! - [`Clock`] — Injectable time source for cutoff computation
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use logtide_core::LogStore;
//!
//! let store = LogStore::new();
//! let at = |m| Utc.with_ymd_and_hms(2025, 3, 17, 10, m, 0).unwrap();
//!
//! store.append("auth", at(15), "success").unwrap();
//! store.append("auth", at(5), "attempt").unwrap();
//!
//! let logs = store.range_query("auth", at(0), at(30)).unwrap();
//! assert_eq!(logs[0].message, "attempt");
//! assert_eq!(logs[1].message, "success");
//!
//! assert_eq!(store.expire(at(10)), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod sweeper;
pub mod traits;
pub mod types;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RetentionConfig, DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL};
pub use error::{Result, StoreError};
pub use store::{shared_store, LogStore, SharedLogStore, StoreStats};
pub use sweeper::{RetentionSweeper, SweeperHandle, SweeperStats};
pub use traits::LogStoreTrait;
pub use types::{LogEntry, TimeRange};
