//! Incoming HTTP request type.
//!
//! Besides the wire data, a request carries a typed extension map. It is the
//! request-scoped context: middleware put values in, downstream handlers and
//! middleware read them back. Nothing in it outlives the request.

use std::net::SocketAddr;

use http::Extensions;

use crate::method::Method;
use crate::middleware::request_id::RequestIdValue;

/// An incoming HTTP request.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) peer: Option<SocketAddr>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// A request with no headers and no peer address.
    ///
    /// The server builds requests from the wire; this constructor exists for
    /// driving handlers and routers directly.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            peer: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn peer(&self) -> Option<SocketAddr> { self.peer }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Correlation id assigned by [`RequestId`](crate::middleware::RequestId),
    /// if that middleware ran upstream.
    pub fn request_id(&self) -> Option<&str> {
        self.extensions.get::<RequestIdValue>().map(|id| id.as_str())
    }
}
