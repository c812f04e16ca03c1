//! HTTP API route definitions.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{health, index, AppState};
use crate::status::SnapshotSource;
use crate::utils::shutdown_signal;

/// Create the router serving the status page.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: SnapshotSource + 'static,
{
    Router::new()
        .route("/", get(index::<S>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the status page on `listener` until a shutdown signal arrives.
pub async fn serve<S>(listener: TcpListener, state: AppState<S>) -> crate::Result<()>
where
    S: SnapshotSource + 'static,
{
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
