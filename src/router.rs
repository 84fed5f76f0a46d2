//! Request router.
//!
//! One radix tree per HTTP method. A path registered under some other method
//! answers `405`, an unknown path `404`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxedHandler, ErasedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if the same method + path is registered twice or `path` is not
    /// a valid route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::Get, path, handler)`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Routes one request and awaits its response.
    pub async fn dispatch(&self, req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Ok(handler) => handler.call(req).await,
            Err(status) => {
                debug!(method = %req.method(), path = req.path(), "no route");
                Response::status(status)
            }
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Result<BoxedHandler, Status> {
        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            return Ok(Arc::clone(matched.value));
        }

        let elsewhere = self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok());
        Err(if elsewhere { Status::MethodNotAllowed } else { Status::NotFound })
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
