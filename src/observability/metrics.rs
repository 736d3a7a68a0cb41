//! Metrics collection and exposition.
//!
//! # Metrics
//! - `locator_requests_total` (counter): requests by status
//! - `locator_request_duration_seconds` (histogram): handler latency
//! - `locator_queries_total` (counter): queries by transport; every
//!   unrecognised `cap` token shares the `unknown` label
//! - `locator_matches_returned` (histogram): routers returned per query
//! - `locator_param_defaulted_total` (counter): defaulted parameters by name
//! - `locator_snapshot_routers` (gauge): routers in the current snapshot
//! - `locator_snapshot_reloads_total` (counter): reloads by outcome
//!
//! Recording is a no-op until a recorder is installed, so the functions
//! are safe to call from tests.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::model::Transport;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    counter!("locator_requests_total", "status" => status.to_string()).increment(1);
    histogram!("locator_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Label for a transport. Client-supplied tokens never become labels.
pub fn transport_label(transport: &Transport) -> &'static str {
    match transport {
        Transport::Udp => "udp",
        Transport::Tcp => "tcp",
        Transport::WebSocket => "wss",
        Transport::Http3 => "http3",
        Transport::Unknown(_) => "unknown",
    }
}

pub fn record_query(transport: &Transport, returned: usize) {
    counter!("locator_queries_total", "transport" => transport_label(transport)).increment(1);
    histogram!("locator_matches_returned").record(returned as f64);
}

pub fn record_param_defaulted(param: &'static str) {
    counter!("locator_param_defaulted_total", "param" => param).increment(1);
}

pub fn record_snapshot(routers: usize) {
    gauge!("locator_snapshot_routers").set(routers as f64);
}

pub fn record_reload(outcome: &'static str) {
    counter!("locator_snapshot_reloads_total", "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rendered: &str, name: &str) -> usize {
        rendered
            .lines()
            .filter(|l| l.starts_with(&format!("{}{{", name)))
            .count()
    }

    #[test]
    fn test_unknown_transports_share_one_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for i in 0..50 {
                record_query(&Transport::from(format!("junk{}", i)), 0);
            }
            record_query(&Transport::Udp, 3);
        });

        let rendered = handle.render();
        assert_eq!(series(&rendered, "locator_queries_total"), 2);
        assert!(rendered.contains(r#"locator_queries_total{transport="unknown"} 50"#));
        assert!(!rendered.contains("junk"));
    }

    #[test]
    fn test_transport_labels() {
        assert_eq!(transport_label(&Transport::WebSocket), "wss");
        assert_eq!(transport_label(&Transport::from("TCP")), "tcp");
        assert_eq!(transport_label(&Transport::from("x-proto")), "unknown");
    }
}
