//! logtide binary.
//!
//! Serves the HTTP API and runs the retention sweeper until Ctrl-C.

use anyhow::Context;
use clap::Parser;
use logtide_server::Cli;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();
    init_tracing(config.log_json)?;
    config.validate().context("invalid configuration")?;

    info!(
        bind = %config.bind_addr,
        retention_secs = config.retention.retention.as_secs(),
        sweep_interval_secs = config.retention.interval.as_secs(),
        "starting logtide"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown signal received");
        signal_token.cancel();
    });

    logtide_server::run(&config, &shutdown)
        .await
        .context("server error")?;
    Ok(())
}
