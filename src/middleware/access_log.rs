//! Access-log middleware.
//!
//! [`AccessLog`] emits one [`AccessRecord`] per request, after the wrapped
//! handler has produced its response. The record goes to a [`LogSink`]:
//!
//! - [`TracingSink`] (default): a `tracing` event with target `access`
//! - [`WriterSink`]: one text line per record on any `io::Write`
//!
//! Line format, space separated, `-` for missing values:
//!
//! ```text
//! 2026-10-18T09:14:03.512204Z 200 84us 111111 GET / 10.0.0.7:53112 "curl/8.5.0"
//! ```
//!
//! The correlation id sits directly before the method. Place [`AccessLog`]
//! inside [`RequestId`](super::RequestId) or the id column is always `-`.
//!
//! If the request future is dropped before the handler returns, the record
//! is still written, with status `-` and the time elapsed until the drop.

use std::fmt;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::handler::{BoxFuture, Next};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;

// ── AccessRecord ──────────────────────────────────────────────────────────────

/// One request, as seen by the access log.
#[derive(Clone, Debug)]
pub struct AccessRecord {
    /// When the request entered the middleware.
    pub timestamp: DateTime<Utc>,
    pub method: Method,
    pub path: String,
    /// `None` when the request was abandoned before a response existed.
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub request_id: Option<String>,
    pub peer: Option<SocketAddr>,
    pub user_agent: Option<String>,
}

impl AccessRecord {
    fn start(req: &Request) -> Self {
        Self {
            timestamp: Utc::now(),
            method: req.method(),
            path: req.path().to_owned(),
            status: None,
            elapsed: Duration::ZERO,
            request_id: req.request_id().map(str::to_owned),
            peer: req.peer(),
            user_agent: req.header("user-agent").map(str::to_owned),
        }
    }

    /// Elapsed time in microseconds, saturating at `u64::MAX`.
    pub fn elapsed_us(&self) -> u64 {
        u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX)
    }
}

/// Renders `Some(v)` as `v` and `None` as `-`.
struct Dash<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Dash<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}us {} {} {} {} \"{}\"",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            Dash(&self.status),
            self.elapsed_us(),
            Dash(&self.request_id),
            self.method,
            self.path,
            Dash(&self.peer),
            Dash(&self.user_agent),
        )
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Destination for access records. Failures stay inside the sink.
pub trait LogSink: Send + Sync + 'static {
    fn record(&self, record: &AccessRecord);
}

impl<S: LogSink> LogSink for Arc<S> {
    fn record(&self, record: &AccessRecord) {
        (**self).record(record)
    }
}

/// Emits records as `tracing` events (target `access`, level `INFO`).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, record: &AccessRecord) {
        info!(
            target: "access",
            method = %record.method,
            path = %record.path,
            status = %Dash(&record.status),
            elapsed_us = record.elapsed_us(),
            request_id = %Dash(&record.request_id),
            "{record}"
        );
    }
}

/// Writes one line per record to `W`.
///
/// Lines from concurrent requests never interleave. Write errors are dropped.
#[derive(Debug)]
pub struct WriterSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Returns the writer, e.g. to inspect a buffer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterSink<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send + 'static> LogSink for WriterSink<W> {
    fn record(&self, record: &AccessRecord) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(out, "{record}").and_then(|()| out.flush());
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Writes one access record per request.
#[derive(Clone)]
pub struct AccessLog {
    sink: Arc<dyn LogSink>,
}

impl AccessLog {
    pub fn new(sink: impl LogSink) -> Self {
        Self { sink: Arc::new(sink) }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl fmt::Debug for AccessLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLog").finish_non_exhaustive()
    }
}

impl Middleware for AccessLog {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let mut pending = Pending {
            sink: Arc::clone(&self.sink),
            started: Instant::now(),
            record: Some(AccessRecord::start(&req)),
        };
        Box::pin(async move {
            let res = next.run(req).await;
            pending.finish(Some(res.status_code()));
            res
        })
    }
}

/// A record waiting for its response. Writes itself on drop if the request
/// never got that far.
struct Pending {
    sink: Arc<dyn LogSink>,
    started: Instant,
    record: Option<AccessRecord>,
}

impl Pending {
    fn finish(&mut self, status: Option<u16>) {
        if let Some(mut record) = self.record.take() {
            record.status = status;
            record.elapsed = self.started.elapsed();
            self.sink.record(&record);
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.finish(None);
    }
}
