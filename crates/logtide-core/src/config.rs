//! Retention configuration.

use std::time::Duration;

use crate::error::{Result, StoreError};

/// Default time between sweeps: 60 seconds.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default maximum entry age: 1 hour.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// How often the sweeper runs and how old an entry may get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Time between sweeps.
    pub interval: Duration,
    /// Maximum age of an entry before it is expired.
    pub retention: Duration,
}

impl RetentionConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
            retention: DEFAULT_RETENTION,
        }
    }

    /// Set the sweep interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the retention window.
    #[must_use]
    pub const fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Retention window as a signed duration for cutoff arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the window does not fit.
    pub fn retention_delta(&self) -> Result<chrono::Duration> {
        chrono::Duration::from_std(self.retention)
            .map_err(|e| StoreError::InvalidConfig(format!("retention out of range: {e}")))
    }

    /// Checks that both durations are usable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if either duration is zero or
    /// the retention window is too large to subtract from a timestamp.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(StoreError::InvalidConfig(
                "sweep interval must be non-zero".to_string(),
            ));
        }
        if self.retention.is_zero() {
            return Err(StoreError::InvalidConfig(
                "retention must be non-zero".to_string(),
            ));
        }
        self.retention_delta().map(|_| ())
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self::new()
    }
}
