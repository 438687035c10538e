//! Background retention sweeper.
//!
//! The [`RetentionSweeper`] expires old entries from a [`LogStoreTrait`]
//! backend on a fixed interval until its [`CancellationToken`] is cancelled.
//! A failed or panicking sweep is logged and counted, and the next tick runs
//! as usual.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::RetentionConfig;
use crate::error::{Result, StoreError};
use crate::traits::LogStoreTrait;

/// Periodically removes entries older than the retention window.
pub struct RetentionSweeper {
    store: Arc<dyn LogStoreTrait>,
    clock: Arc<dyn Clock>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    /// Creates a sweeper for `store` that reads the time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        store: Arc<dyn LogStoreTrait>,
        clock: Arc<dyn Clock>,
        config: RetentionConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            config,
        })
    }

    /// Creates a sweeper driven by the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if `config` does not validate.
    pub fn with_system_clock(store: Arc<dyn LogStoreTrait>, config: RetentionConfig) -> Result<Self> {
        Self::new(store, Arc::new(SystemClock), config)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// The instant before which entries are expired: `now - retention`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ExpireFailed`] if the cutoff is not representable.
    pub fn cutoff(&self) -> Result<DateTime<Utc>> {
        let retention = self.config.retention_delta()?;
        let now = self.clock.now();
        now.checked_sub_signed(retention).ok_or_else(|| {
            StoreError::ExpireFailed(format!("cutoff underflows: now={now}, retention={retention}"))
        })
    }

    /// Runs a single expiration pass and returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutoff cannot be computed or the store fails.
    pub fn sweep_once(&self) -> Result<usize> {
        let cutoff = self.cutoff()?;
        let removed = self.store.expire(cutoff)?;
        debug!(%cutoff, removed, "retention sweep complete");
        Ok(removed)
    }

    /// Like [`sweep_once`](Self::sweep_once), but a panic inside the store is
    /// turned into an error.
    fn sweep_guarded(&self) -> Result<usize> {
        panic::catch_unwind(AssertUnwindSafe(|| self.sweep_once())).unwrap_or_else(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(StoreError::ExpireFailed(format!("sweep panicked: {reason}")))
        })
    }

    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// The first sweep runs one full interval after this call. The loop exits
    /// when `shutdown` is cancelled or [`SweeperHandle::stop`] is called.
    #[must_use]
    pub fn spawn(self, shutdown: CancellationToken) -> SweeperHandle {
        let running = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(SweepCounters::default());

        let interval = self.config.interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = {
            let running = Arc::clone(&running);
            let counters = Arc::clone(&counters);
            let shutdown = shutdown.clone();

            tokio::spawn(async move {
                info!(
                    interval_secs = interval.as_secs_f64(),
                    retention_secs = self.config.retention.as_secs_f64(),
                    "retention sweeper started"
                );

                loop {
                    tokio::select! {
                        biased;
                        () = shutdown.cancelled() => break,
                        _ = ticker.tick() => {}
                    }

                    match self.sweep_guarded() {
                        Ok(removed) => {
                            counters.record_success(removed);
                            if removed > 0 {
                                info!(removed, "expired old log entries");
                            }
                        }
                        Err(e) => {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            warn!(error = %e, "retention sweep failed, retrying next interval");
                        }
                    }
                }

                running.store(false, Ordering::SeqCst);
                info!("retention sweeper stopped");
            })
        };

        SweeperHandle {
            shutdown,
            running,
            counters,
            task,
        }
    }
}

#[derive(Debug, Default)]
struct SweepCounters {
    completed: AtomicU64,
    failed: AtomicU64,
    removed: AtomicU64,
}

impl SweepCounters {
    fn record_success(&self, removed: usize) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.removed
            .fetch_add(u64::try_from(removed).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    fn snapshot(&self) -> SweeperStats {
        SweeperStats {
            sweeps_completed: self.completed.load(Ordering::Relaxed),
            failed_sweeps: self.failed.load(Ordering::Relaxed),
            entries_removed: self.removed.load(Ordering::Relaxed),
        }
    }
}

/// Counters reported by a running or finished sweeper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweeperStats {
    /// Sweeps that finished without error.
    pub sweeps_completed: u64,
    /// Sweeps that returned an error or panicked.
    pub failed_sweeps: u64,
    /// Total entries removed across all sweeps.
    pub entries_removed: u64,
}

/// Handle for controlling a spawned sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: CancellationToken,
    running: Arc<AtomicBool>,
    counters: Arc<SweepCounters>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Check if the sweep loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> SweeperStats {
        self.counters.snapshot()
    }

    /// Signal the sweep loop to stop after the current sweep.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Stop the loop and wait for it to exit, returning the final counters.
    pub async fn shutdown(self) -> SweeperStats {
        self.stop();
        if let Err(e) = self.task.await {
            error!(error = %e, "retention sweeper task ended abnormally");
        }
        self.running.store(false, Ordering::SeqCst);
        self.counters.snapshot()
    }
}
