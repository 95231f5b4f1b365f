//! Access-log recording.
//!
//! The [`AccessLogRecorder`] captures request metadata when a request enters
//! the logged part of the chain and the terminal outcome when it leaves. It
//! fans both events out to a list of [`AccessLogSink`]s. Recording is purely
//! observational: a sink that returns an error or panics is reported via
//! `tracing` and otherwise ignored.
//!
//! Cancellation is covered by [`InFlight`]: if the request future is dropped
//! before [`InFlight::finish`] runs, the guard records [`Outcome::Cancelled`]
//! from its `Drop` impl.

use chrono::{DateTime, Utc};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};
use warden_kernel::gateway::{ChainError, GatewayRequest, GatewayResponse, HttpMethod};

// ─────────────────────────────────────────────────────────────────────────────
// Entries and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Request metadata captured at entry.
#[derive(Debug, Clone)]
pub struct AccessEntry {
    pub request_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<String>,
    pub started_at: DateTime<Utc>,
    start: Instant,
}

impl AccessEntry {
    pub fn from_request(request: &GatewayRequest) -> Self {
        Self {
            request_id: request.id.clone(),
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Wall-clock time since the entry was captured.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// How a logged request ended.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Response(&'a GatewayResponse),
    Error(&'a ChainError),
    /// The request future was dropped before completing.
    Cancelled,
}

impl Outcome<'_> {
    /// Status code the client saw, if any was produced.
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Response(resp) => Some(resp.status),
            Outcome::Error(err) => Some(err.status()),
            Outcome::Cancelled => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sinks
// ─────────────────────────────────────────────────────────────────────────────

/// Failure reported by an [`AccessLogSink`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Destination for access-log events.
pub trait AccessLogSink: Send + Sync {
    fn name(&self) -> &str;

    /// Called when a request enters the logged part of the chain.
    fn on_request(&self, _entry: &AccessEntry) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called exactly once per entry with the terminal outcome.
    fn on_complete(
        &self,
        entry: &AccessEntry,
        outcome: &Outcome<'_>,
        elapsed: Duration,
    ) -> Result<(), SinkError>;
}

/// Writes access events as structured `tracing` events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AccessLogSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_request(&self, entry: &AccessEntry) -> Result<(), SinkError> {
        info!(
            request_id = %entry.request_id,
            method     = entry.method.as_str(),
            path       = %entry.path,
            query      = entry.query.as_deref().unwrap_or(""),
            ">>> incoming request"
        );
        Ok(())
    }

    fn on_complete(
        &self,
        entry: &AccessEntry,
        outcome: &Outcome<'_>,
        elapsed: Duration,
    ) -> Result<(), SinkError> {
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Outcome::Response(resp) if resp.status >= 500 => error!(
                request_id  = %entry.request_id,
                status      = resp.status,
                backend     = %resp.backend_id,
                duration_ms,
                "<<< outgoing response"
            ),
            Outcome::Response(resp) => info!(
                request_id  = %entry.request_id,
                status      = resp.status,
                backend     = %resp.backend_id,
                duration_ms,
                "<<< outgoing response"
            ),
            Outcome::Error(err) => error!(
                request_id  = %entry.request_id,
                status      = err.status(),
                error       = %err,
                duration_ms,
                "<<< request failed"
            ),
            Outcome::Cancelled => warn!(
                request_id  = %entry.request_id,
                duration_ms,
                "<<< request cancelled by client"
            ),
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recorder
// ─────────────────────────────────────────────────────────────────────────────

/// Fans access events out to every registered sink.
#[derive(Default, Clone)]
pub struct AccessLogRecorder {
    sinks: Vec<Arc<dyn AccessLogSink>>,
}

impl AccessLogRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a sink.
    pub fn with_sink(mut self, sink: Arc<dyn AccessLogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Capture entry metadata and notify the sinks.
    pub fn before(&self, request: &GatewayRequest) -> AccessEntry {
        let entry = AccessEntry::from_request(request);
        for sink in &self.sinks {
            guarded(sink.name(), || sink.on_request(&entry));
        }
        entry
    }

    /// Report the terminal outcome of `entry` to the sinks.
    pub fn after(&self, entry: &AccessEntry, outcome: Outcome<'_>, elapsed: Duration) {
        for sink in &self.sinks {
            guarded(sink.name(), || sink.on_complete(entry, &outcome, elapsed));
        }
    }

    /// Start recording `request`; the returned guard reports the outcome.
    pub fn begin(&self, request: &GatewayRequest) -> InFlight<'_> {
        InFlight {
            recorder: self,
            entry: Some(self.before(request)),
        }
    }
}

fn guarded(sink: &str, f: impl FnOnce() -> Result<(), SinkError>) {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(sink, error = %e, "access-log sink failed"),
        Err(_) => warn!(sink, "access-log sink panicked"),
    }
}

/// Outstanding access-log entry.
///
/// Dropping the guard without calling [`finish`](Self::finish) records
/// [`Outcome::Cancelled`], or an internal error when dropped during a panic.
pub struct InFlight<'a> {
    recorder: &'a AccessLogRecorder,
    entry: Option<AccessEntry>,
}

impl InFlight<'_> {
    pub fn entry(&self) -> Option<&AccessEntry> {
        self.entry.as_ref()
    }

    /// Record the outcome and return the elapsed time.
    pub fn finish(mut self, outcome: Outcome<'_>) -> Duration {
        match self.entry.take() {
            Some(entry) => {
                let elapsed = entry.elapsed();
                self.recorder.after(&entry, outcome, elapsed);
                elapsed
            }
            None => Duration::ZERO,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        let elapsed = entry.elapsed();
        if std::thread::panicking() {
            let err = ChainError::Internal("filter chain panicked".to_string());
            self.recorder.after(&entry, Outcome::Error(&err), elapsed);
        } else {
            self.recorder.after(&entry, Outcome::Cancelled, elapsed);
        }
    }
}
