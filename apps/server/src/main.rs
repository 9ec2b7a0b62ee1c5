//! # Atelier Server
//!
//! HTTP API backend for the print shop management frontend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Atelier Server                                  │
//! │                                                                         │
//! │  Browser ───► HTTP/JSON (8080) ───► Handlers ───► AppState             │
//! │                                         │             │                 │
//! │                                         │             ▼                 │
//! │                                         │        JSON documents         │
//! │                                         │        (data/*.json)          │
//! │                                         ▼                               │
//! │                                   Gemini API                            │
//! │                                  (best effort)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod config;
mod error;
mod insight;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use atelier_store::Store;

use crate::config::ServerConfig;
use crate::state::{AppState, SharedState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Atelier server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        data_dir = %config.data_dir,
        ai_enabled = config.gemini_api_key.is_some(),
        "Configuration loaded"
    );

    // Open the document store and load state
    let store = Store::open(&config.data_dir)?;
    let state: SharedState = Arc::new(AppState::new(store, config.clone()));

    // Salary slips due as of today, then re-check once a day
    if let Err(err) = api::payroll::run_generation(&state) {
        warn!(%err, "startup slip generation failed");
    }
    tokio::spawn(slip_generation_loop(state.clone()));

    // Build the router
    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Re-runs slip generation once a day so slips appear even when the process
/// stays up across a cutoff day. Generation is idempotent, so the overlap
/// with the startup run is harmless.
async fn slip_generation_loop(state: SharedState) {
    let mut ticker = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
    ticker.tick().await; // first tick fires immediately, startup already ran

    loop {
        ticker.tick().await;
        if let Err(err) = api::payroll::run_generation(&state) {
            error!(%err, "scheduled slip generation failed");
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
