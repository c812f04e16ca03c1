//! The status page: fetch, then render.

use axum::http::StatusCode;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::metrics;

use super::client::SnapshotSource;
use super::render::{render_snapshot, render_unavailable};

/// Result of one page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// HTTP status to serve the page with.
    pub status: StatusCode,
    /// Full HTML document.
    pub html: String,
}

impl RenderedPage {
    /// Whether the fallback page was rendered.
    pub fn is_fallback(&self) -> bool {
        !self.status.is_success()
    }
}

/// Server-rendered status page over a snapshot source.
#[derive(Debug, Clone)]
pub struct StatusPage<S> {
    source: S,
    title: String,
}

impl<S: SnapshotSource> StatusPage<S> {
    /// Create a page that fetches from `source` on every render.
    pub fn new(source: S, title: impl Into<String>) -> Self {
        Self {
            source,
            title: title.into(),
        }
    }

    /// Get the snapshot source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch a fresh snapshot and render it, or render the fallback page.
    pub async fn render(&self) -> RenderedPage {
        let outcome = self.source.fetch_snapshot().await;
        let now = OffsetDateTime::now_utc();

        match outcome {
            Ok(snapshot) => {
                info!(
                    domains = ?snapshot.current_num_of_domains,
                    crawled = ?snapshot.current_num_of_crawled_domains,
                    webpages = ?snapshot.current_num_of_webpages,
                    "Rendering status page"
                );
                metrics::inc_renders("ok");

                RenderedPage {
                    status: StatusCode::OK,
                    html: render_snapshot(&self.title, &snapshot, now),
                }
            }
            Err(e) => {
                let kind = e.kind();
                warn!(kind = %kind, error = %e, "Status unavailable, rendering fallback");
                metrics::inc_fetch_failures(kind);
                metrics::inc_renders("fallback");

                RenderedPage {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    html: render_unavailable(&self.title, kind, now),
                }
            }
        }
    }
}
