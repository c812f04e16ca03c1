//! HTTP client for the backend status endpoint.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, FetchError};
use crate::metrics;

use super::types::StatusSnapshot;

/// Largest response body accepted from the status endpoint.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Anything that can produce a fresh status snapshot for one render.
pub trait SnapshotSource: Send + Sync {
    /// Fetch a new snapshot. Every call must hit the source again.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<StatusSnapshot, FetchError>> + Send;
}

/// Client for the backend status endpoint.
#[derive(Debug, Clone)]
pub struct StatusClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Status endpoint URL.
    base_url: Url,
}

impl StatusClient {
    /// Create a client for the given status endpoint.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Create a client from validated application configuration.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let base_url = config.base_url().map_err(AppError::InvalidConfig)?;
        Ok(Self::new(base_url, config.http_timeout())?)
    }

    /// Get the status endpoint URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET the status endpoint and parse the body into a snapshot.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        debug!("Requesting status snapshot");
        let start = Instant::now();

        let result = self.request().await;
        metrics::record_fetch_latency(start);

        match &result {
            Ok(snapshot) => debug!(?snapshot, "Received status snapshot"),
            Err(e) => debug!(error = %e, "Status request failed"),
        }

        result
    }

    async fn request(&self) -> Result<StatusSnapshot, FetchError> {
        let mut response = self.http.get(self.base_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_BODY_BYTES as u64 {
                return Err(FetchError::BodyTooLarge {
                    limit: MAX_BODY_BYTES,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(FetchError::BodyTooLarge {
                    limit: MAX_BODY_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }

        StatusSnapshot::parse(&body)
    }
}

impl SnapshotSource for StatusClient {
    async fn fetch_snapshot(&self) -> Result<StatusSnapshot, FetchError> {
        self.fetch().await
    }
}
