//! Middleware layer.
//!
//! A middleware is a transformation from handler to handler. It sees the
//! request on the way in, decides when to call the rest of the chain through
//! [`Next`], and sees the response on the way out.
//!
//! ```rust
//! use greetd::middleware::{AccessLog, Middleware, RequestId};
//! use greetd::{Request, Response};
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::text("hi")
//! }
//!
//! // Outermost first: the id exists before the access log looks for it.
//! let handler = RequestId::default().wrap(AccessLog::default().wrap(hello));
//! # let _ = handler;
//! ```
//!
//! Wrapped handlers are ordinary [`Handler`]s, so they can be registered on a
//! [`Router`](crate::Router) or wrapped again.
//!
//! Built-in middleware:
//! - [`RequestId`]: assigns a correlation id, echoes it as `X-Request-Id`
//! - [`AccessLog`]: one access record per request, after the handler returns

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, Next, Sealed};
use crate::request::Request;

pub mod access_log;
pub mod request_id;

pub use access_log::{AccessLog, AccessRecord, LogSink, TracingSink, WriterSink};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdValue};

/// Cross-cutting behavior around a handler.
///
/// The returned future is `'static`: clone whatever state the request needs
/// out of `self` before moving into the async block.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;

    /// Wraps `inner`, producing a handler that runs this middleware first.
    fn wrap<H: Handler>(self, inner: H) -> Layered<Self>
    where
        Self: Sized,
    {
        Layered { middleware: self, inner: inner.into_boxed_handler() }
    }
}

/// A handler with one middleware in front of it.
pub struct Layered<M> {
    middleware: M,
    inner: BoxedHandler,
}

impl<M: Middleware> ErasedHandler for Layered<M> {
    fn call(&self, req: Request) -> BoxFuture {
        self.middleware.handle(req, Next::new(Arc::clone(&self.inner)))
    }
}

impl<M: Middleware> Sealed for Layered<M> {}

impl<M: Middleware> Handler for Layered<M> {
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}
