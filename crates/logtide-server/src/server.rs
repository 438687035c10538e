//! HTTP server wrapper around the router.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use logtide_core::{shared_store, RetentionSweeper, SharedLogStore, SweeperStats};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::routes::create_router;
use crate::state::AppState;

/// HTTP front end for a shared log store.
#[derive(Debug, Clone)]
pub struct LogServer {
    state: Arc<AppState>,
}

impl LogServer {
    /// Create a server that serves `store`.
    #[must_use]
    pub fn new(store: SharedLogStore) -> Self {
        Self {
            state: Arc::new(AppState::new(store)),
        }
    }

    /// Get the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state())
    }

    /// Bind to `addr` and serve until `shutdown` completes.
    ///
    /// In-flight requests are allowed to finish before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server stops abnormally.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::BindFailed(addr, e))?;

        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server stops abnormally.
    pub async fn serve_listener<F>(&self, listener: TcpListener, shutdown: F) -> ApiResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        info!(addr = %addr, "logtide server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        info!("logtide server shut down");
        Ok(())
    }
}

/// Start the retention sweeper and serve `config.bind_addr` until `shutdown`
/// is cancelled.
///
/// The sweeper is stopped once the server returns, whatever the outcome, and
/// its final counters are handed back.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, binding fails or the
/// server stops abnormally.
pub async fn run(config: &ServerConfig, shutdown: &CancellationToken) -> ApiResult<SweeperStats> {
    config.validate()?;

    let store = shared_store();
    let sweeper = RetentionSweeper::with_system_clock(store.clone(), config.retention)?
        .spawn(shutdown.child_token());

    let server = LogServer::new(store);
    let result = server
        .serve_with_shutdown(config.bind_addr, shutdown.clone().cancelled_owned())
        .await;

    shutdown.cancel();
    let stats = sweeper.shutdown().await;
    info!(
        sweeps = stats.sweeps_completed,
        failed = stats.failed_sweeps,
        removed = stats.entries_removed,
        "retention sweeper finished"
    );

    result.map(|()| stats)
}
