//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

use crate::status::{SnapshotSource, StatusClient, StatusPage};

/// Application state shared with handlers.
#[derive(Debug)]
pub struct AppState<S = StatusClient> {
    /// The page rendered on `/`.
    pub page: Arc<StatusPage<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
        }
    }
}

impl<S: SnapshotSource> AppState<S> {
    /// Create new app state around a page.
    pub fn new(page: StatusPage<S>) -> Self {
        Self {
            page: Arc::new(page),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200, never touches the backend.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Status page handler - fetches a fresh snapshot and renders it.
pub async fn index<S: SnapshotSource>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let rendered = state.page.render().await;
    (rendered.status, Html(rendered.html))
}
