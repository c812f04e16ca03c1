//! Prometheus metrics for page renders and backend fetches.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, info};

use crate::error::FailureKind;

// === Metric Name Constants ===

/// Page renders counter metric name, labelled by outcome.
pub const METRIC_RENDERS: &str = "status_page_renders_total";
/// Fetch failures counter metric name, labelled by failure kind.
pub const METRIC_FETCH_FAILURES: &str = "status_fetch_failures_total";
/// Backend fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "status_fetch_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_RENDERS, "Total number of status page renders");
    describe_counter!(
        METRIC_FETCH_FAILURES,
        "Total number of failed status snapshot fetches"
    );
    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Status snapshot fetch latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder with its own scrape listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record backend fetch latency.
pub fn record_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FETCH_LATENCY).record(latency_ms);
}

/// Increment the renders counter.
pub fn inc_renders(outcome: &'static str) {
    counter!(METRIC_RENDERS, "outcome" => outcome).increment(1);
}

/// Increment the fetch failures counter.
pub fn inc_fetch_failures(kind: FailureKind) {
    counter!(METRIC_FETCH_FAILURES, "kind" => kind.as_ref().to_string()).increment(1);
}
