//! # logtide-server
//!
//! HTTP ingest and query front end for [`logtide_core`].
//!
//! ## Endpoints
//!
//! | Method | Path      | Purpose                                        |
//! |--------|-----------|------------------------------------------------|
//! | POST   | `/logs`   | Ingest `{service_name, timestamp, message}`    |
//! | GET    | `/logs`   | Query `?service=..&start=..&end=..`, oldest first |
//! | GET    | `/health` | Liveness and store size                        |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod timestamp;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::LogRecord;
pub use routes::create_router;
pub use server::{run, LogServer};
pub use state::AppState;
