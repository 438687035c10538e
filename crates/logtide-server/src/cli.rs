//! Command-line arguments for the `logtide` binary.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::config::ServerConfig;

/// In-memory, time-windowed log aggregation service.
#[derive(Debug, Parser)]
#[command(name = "logtide")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "LOGTIDE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Maximum age of a log entry, in seconds
    #[arg(long, env = "LOGTIDE_RETENTION_SECS", default_value_t = 3600)]
    pub retention_secs: u64,

    /// Time between expiration sweeps, in seconds
    #[arg(long, env = "LOGTIDE_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOGTIDE_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Build the server configuration from parsed arguments.
    #[must_use]
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig::new(self.bind)
            .with_retention(Duration::from_secs(self.retention_secs))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
            .with_log_json(self.log_json)
    }
}
