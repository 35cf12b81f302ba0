//! Trivia API backend
//!
//! - Axum HTTP JSON API: categories, paginated questions, search, quiz play
//! - Question store: in-memory by default, SQLite when a database path is set
//! - Seeds an empty store from a TOML bank or the built-in one
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   TRIVIA_CONFIG_PATH : path to TOML config (database path + optional question bank)
//!   TRIVIA_DB_PATH     : SQLite file; overrides `database_path` from the config
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod store;
mod state;
mod error;
mod paging;
mod filter;
mod quiz;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Open + seed the question store; it is the only state shared across requests.
  let state = Arc::new(AppState::from_env()?);

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "trivia_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "trivia_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "trivia_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
}
