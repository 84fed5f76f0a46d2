//! Correlation-id middleware.
//!
//! Every request passing through [`RequestId`] gets exactly one id:
//!
//! - produced by the configured generator (one call per request), or taken
//!   from an incoming `X-Request-Id` when [`RequestId::trust_incoming`] is on
//! - stored in the request extensions as [`RequestIdValue`], where anything
//!   downstream reads it via [`Request::request_id`]
//! - echoed in the `X-Request-Id` response header
//! - attached to a `tracing` span covering the rest of the chain

use std::fmt;
use std::sync::Arc;

use http::HeaderValue;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::handler::{BoxFuture, Next};
use crate::middleware::Middleware;
use crate::request::Request;

/// Header carrying the correlation id, in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The correlation id as stored in request extensions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestIdValue(String);

impl RequestIdValue {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestIdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Generator = Arc<dyn Fn() -> String + Send + Sync>;

/// Assigns a correlation id to each request.
///
/// ```rust
/// use greetd::middleware::RequestId;
///
/// // Deterministic ids, e.g. in tests.
/// let fixed = RequestId::new(|| "111111".to_owned());
///
/// // UUID v4, ignoring whatever the client sent.
/// let random = RequestId::default();
/// # let _ = (fixed, random);
/// ```
#[derive(Clone)]
pub struct RequestId {
    generate: Generator,
    trust_incoming: bool,
}

impl RequestId {
    pub fn new(generate: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self { generate: Arc::new(generate), trust_incoming: false }
    }

    /// Reuse a non-empty `X-Request-Id` sent by the client instead of
    /// generating one. Only turn this on behind a proxy that sets the header.
    pub fn trust_incoming(mut self, trust: bool) -> Self {
        self.trust_incoming = trust;
        self
    }

    fn assign(&self, req: &Request) -> String {
        let incoming = self
            .trust_incoming
            .then(|| req.header(REQUEST_ID_HEADER))
            .flatten()
            .filter(|id| !id.is_empty());

        match incoming {
            Some(id) => id.to_owned(),
            None => (self.generate)(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new(|| Uuid::new_v4().to_string())
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestId")
            .field("trust_incoming", &self.trust_incoming)
            .finish_non_exhaustive()
    }
}

impl Middleware for RequestId {
    fn handle(&self, mut req: Request, next: Next) -> BoxFuture {
        let id = self.assign(&req);
        req.extensions_mut().insert(RequestIdValue::new(id.clone()));

        let span = info_span!("request", request_id = %id);
        Box::pin(
            async move {
                let mut res = next.run(req).await;
                if HeaderValue::from_str(&id).is_ok() {
                    res.set_header(REQUEST_ID_HEADER, &id);
                } else {
                    debug!("request id is not a valid header value, not echoing it");
                }
                res
            }
            .instrument(span),
        )
    }
}
