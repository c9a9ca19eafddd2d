//! Grammar Growth Challenge · quiz backend
//!
//! - Axum HTTP API: start a quiz, record picks, submit, download results
//! - Result downloads as CSV, XLSX and PDF
//! - Static quiz page (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   QUIZ_CONFIG_PATH : path to TOML config (question bank, tips, feedback thresholds)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod seeds;
mod sampler;
mod session;
mod scoring;
mod export;
mod error;
mod state;
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

  // Question bank + settings, shared read-only; sessions live in the registry.
  let state = Arc::new(AppState::new()?);

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "grammar_quiz", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "grammar_quiz", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "grammar_quiz", error = %e, "Failed to listen for Ctrl-C");
  }
}
