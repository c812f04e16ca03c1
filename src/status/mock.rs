//! Scripted snapshot source for tests.
//!
//! Replays a queue of canned backend responses without making network
//! requests, and counts how many fetches were issued.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::error::FetchError;

use super::client::SnapshotSource;
use super::types::StatusSnapshot;

/// One canned backend response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Raw body served with `200 OK`; goes through the real parse step.
    Body(String),
    /// Non-success status, body ignored.
    Status(StatusCode),
}

/// Scripted snapshot source.
#[derive(Debug, Clone, Default)]
pub struct MockSnapshotSource {
    /// Responses served in order; the last one repeats once the queue drains.
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Number of fetches issued.
    calls: Arc<AtomicUsize>,
}

impl MockSnapshotSource {
    /// Create an empty source. Fetching from it yields a 503 status failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that always serves `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        let source = Self::new();
        source.push(MockResponse::Body(body.into()));
        source
    }

    /// Queue a response.
    pub fn push(&self, response: MockResponse) {
        self.queue().push_back(response);
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<MockResponse>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_response(&self) -> MockResponse {
        let mut queue = self.queue();
        match queue.len() {
            0 => MockResponse::Status(StatusCode::SERVICE_UNAVAILABLE),
            1 => queue[0].clone(),
            _ => queue
                .pop_front()
                .unwrap_or(MockResponse::Status(StatusCode::SERVICE_UNAVAILABLE)),
        }
    }
}

impl SnapshotSource for MockSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<StatusSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.next_response() {
            MockResponse::Body(body) => StatusSnapshot::parse(body.as_bytes()),
            MockResponse::Status(status) => Err(FetchError::UnexpectedStatus(status)),
        }
    }
}
