//! HTTP server setup and routing.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::client::DriveClient;
use crate::handlers;

/// Shared application context passed to all handlers.
///
/// Read-only after startup; cloning hands out cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub client: DriveClient,
}

/// Build the router with the public routes and CORS policy.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/songs", get(handlers::list_songs))
        .route("/stream/:file_id", get(handlers::stream_song))
        .with_state(state)
        .layer(cors)
}

/// Run the HTTP server until shutdown.
pub async fn run(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
