//! HTTP server, readiness lifecycle and graceful shutdown.
//!
//! The server drives the readiness flag through its whole life:
//!
//! 1. Bind the listener. Readiness is still `NotReady`.
//! 2. Listening: mark `Ready`. `/healthz` starts answering `200`.
//! 3. SIGTERM or Ctrl-C: mark `NotReady` first, so health checks fail while the
//!    process drains, then stop accepting connections.
//! 4. Wait for in-flight connections, at most the shutdown timeout, then
//!    abort whatever is left and return.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::readiness::Readiness;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    readiness: Readiness,
    shutdown_timeout: Duration,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self {
            addr,
            readiness: Readiness::new(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// The flag the server sets once listening and clears on shutdown. Pass
    /// the same handle the handlers were built with.
    pub fn readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    /// Upper bound on draining in-flight connections. Defaults to 30 s.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then shuts down gracefully.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but shuts down when `signal` resolves.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| Error::Bind { addr: self.addr, source })?;
        self.serve_listener(listener, router, signal).await
    }

    /// Serves on an already-bound listener. The configured address is unused.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let local = listener.local_addr()?;
        let router = Arc::new(router);
        let mut tasks = JoinSet::new();

        info!(addr = %local, "greetd listening");
        self.readiness.set_ready();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Shutdown wins over queued connections.
                biased;

                () = &mut signal => {
                    self.readiness.set_not_ready();
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req, peer).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %peer, "connection error: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        let drained = tokio::time::timeout(self.shutdown_timeout, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(remaining = tasks.len(), "shutdown timeout elapsed, aborting connections");
            tasks.shutdown().await;
        }

        info!("greetd stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Converts one hyper request, routes it, converts the response back.
///
/// Infallible: every failure becomes a status code.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let response = match into_request(req, peer) {
        Ok(req) => router.dispatch(req).await,
        Err(status) => Response::status(status),
    };
    Ok(response.into_inner())
}

/// No route reads a body, so the body stream is dropped unread and routing
/// starts as soon as the head is parsed.
fn into_request(req: hyper::Request<Incoming>, peer: SocketAddr) -> Result<Request, Status> {
    let (parts, _body) = req.into_parts();

    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        return Err(Status::MethodNotAllowed);
    };

    let headers = parts.headers.iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect();

    Ok(Request {
        method,
        path: parts.uri.path().to_owned(),
        headers,
        peer: Some(peer),
        extensions: parts.extensions,
    })
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM (Unix) or Ctrl-C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;
    use crate::health;

    #[tokio::test]
    async fn readiness_follows_lifecycle() {
        let readiness = Readiness::new();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let router = Router::new().get("/healthz", health::healthz(readiness.clone()));
        let server = tokio::spawn(
            Server::bind(addr)
                .readiness(readiness.clone())
                .serve_listener(listener, router, async move {
                    let _ = stopped.await;
                }),
        );

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
        assert!(readiness.is_ready());

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(!readiness.is_ready());
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = Server::bind(addr)
            .serve_with_shutdown(Router::new(), std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Bind { .. }));
    }
}
