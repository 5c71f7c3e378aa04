//! HTTP receiver for finished recognition jobs.
//!
//! The speech-to-text service first verifies the callback URL by sending a
//! `challenge_string` that must be echoed back, then posts each finished
//! job with the episode name as `user_token`.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::CallbackState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use casebook_core::{Catalog, Config};

/// Serves the callback receiver until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(CallbackState::new(Catalog::from_config(&config.catalog)));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Callback server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Callback server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
