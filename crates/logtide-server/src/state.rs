//! Shared state for request handlers.

use std::time::Instant;

use logtide_core::SharedLogStore;

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState {
    store: SharedLogStore,
    started_at: Instant,
}

impl AppState {
    /// Create state around an existing store handle.
    #[must_use]
    pub fn new(store: SharedLogStore) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }

    /// The log store.
    #[must_use]
    pub const fn store(&self) -> &SharedLogStore {
        &self.store
    }

    /// Seconds since the state was created.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
