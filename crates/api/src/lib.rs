//! `api` crate — the business case entry page.
//!
//! Exposes a single page:
//!   GET    /    render the form (`?saved=<id>` adds the success banner)
//!   POST   /    validate and save a submission

pub mod handlers;
pub mod render;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::AppState;

/// Build the router for the entry page.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::form::show).post(handlers::form::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind` and serve the entry page until Ctrl+C or SIGTERM.
pub async fn serve(bind: &str, state: AppState) -> Result<(), ServerError> {
    let addr: SocketAddr = bind.parse().map_err(|_| ServerError::InvalidBind {
        value: bind.to_owned(),
    })?;

    let listener = TcpListener::bind(addr).await?;
    info!("Business case entry listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => info!("Received SIGTERM, starting shutdown"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid bind address '{value}'")]
    InvalidBind { value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
