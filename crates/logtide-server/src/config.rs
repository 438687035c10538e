//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use logtide_core::{RetentionConfig, StoreError};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 5000);

/// Configuration for the logtide server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// Sweep interval and retention window.
    pub retention: RetentionConfig,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl ServerConfig {
    /// Create a new configuration with the specified bind address.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            retention: RetentionConfig::new(),
            log_json: false,
        }
    }

    /// Set the retention window.
    #[must_use]
    pub const fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = self.retention.with_retention(retention);
        self
    }

    /// Set the sweep interval.
    #[must_use]
    pub const fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.retention = self.retention.with_interval(interval);
        self
    }

    /// Enable JSON log output.
    #[must_use]
    pub const fn with_log_json(mut self, enabled: bool) -> Self {
        self.log_json = enabled;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the retention settings are unusable.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.retention.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_ADDR)
    }
}
