//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): evaluations by gate, mode, outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::gate::{GateMode, Verdict};

/// Install the Prometheus recorder with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one gate decision.
pub fn record_decision(gate: &str, mode: GateMode, verdict: Verdict) {
    metrics::counter!(
        "gate_decisions_total",
        "gate" => gate.to_string(),
        "mode" => mode.as_str(),
        "outcome" => verdict.as_str()
    )
    .increment(1);
}
