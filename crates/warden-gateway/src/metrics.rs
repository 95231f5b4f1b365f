//! Prometheus request metrics.
//!
//! [`GatewayMetrics`] owns its own [`Registry`] and is fed through the
//! [`AccessLogSink`] interface, so every request that passes the access-log
//! filter is counted exactly once. The registry is exported as text by the
//! actuator backend at `/actuator/prometheus`.

use crate::access_log::{AccessEntry, AccessLogSink, Outcome, SinkError};
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Request counters and latency histogram.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    cancelled_total: IntCounter,
}

impl GatewayMetrics {
    /// Create and register all gateway metrics in a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("warden_requests_total", "Completed requests by method and status"),
            &["method", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "warden_request_duration_seconds",
                "Request latency through the gateway",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["method"],
        )?;
        let cancelled_total = IntCounter::new(
            "warden_requests_cancelled_total",
            "Requests abandoned by the client before completion",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(cancelled_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            cancelled_total,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }

    pub fn requests(&self, method: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, status.as_str()])
            .get()
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled_total.get()
    }
}

impl AccessLogSink for GatewayMetrics {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn on_complete(
        &self,
        entry: &AccessEntry,
        outcome: &Outcome<'_>,
        elapsed: Duration,
    ) -> Result<(), SinkError> {
        let method = entry.method.as_str();
        self.request_duration
            .with_label_values(&[method])
            .observe(elapsed.as_secs_f64());

        match outcome.status() {
            Some(status) => {
                let status = status.to_string();
                self.requests_total
                    .with_label_values(&[method, status.as_str()])
                    .inc();
            }
            None => self.cancelled_total.inc(),
        }
        Ok(())
    }
}
