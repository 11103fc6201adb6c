//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webmock_requests_total` (counter): requests by method and outcome (`matched`/`unmatched`)
//! - `webmock_stubs_registered_total` (counter): stubs added to any registry

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Whether a request found a stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Unmatched,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::Unmatched => "unmatched",
        }
    }
}

pub fn record_request(method: &str, outcome: Outcome) {
    metrics::counter!(
        "webmock_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_registered(count: usize) {
    metrics::counter!("webmock_stubs_registered_total").increment(count as u64);
}

/// Serve Prometheus metrics on `addr`. Must be called inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
