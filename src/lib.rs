//! # greetd
//!
//! A small HTTP service with two endpoints, both gated on one readiness flag:
//!
//! | Path | Not ready | Ready |
//! |---|---|---|
//! | `GET /healthz` | `503`, empty | `200`, empty |
//! | `GET /` | `500`, `Not ready yet, World!` | `200`, `Hello, World!` |
//!
//! `/` runs behind two middleware: [`RequestId`](middleware::RequestId)
//! assigns a correlation id and echoes it as `X-Request-Id`, then
//! [`AccessLog`](middleware::AccessLog) writes one record per request
//! carrying that id. `/healthz` runs bare.
//!
//! The [`Server`] flips the flag: ready once listening, not ready as soon as
//! shutdown begins, never ready again afterwards.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use greetd::middleware::{AccessLog, RequestId};
//! use greetd::{Readiness, Server, app};
//!
//! #[tokio::main]
//! async fn main() {
//!     let readiness = Readiness::new();
//!     let router = app::router(readiness.clone(), RequestId::default(), AccessLog::default());
//!
//!     Server::bind("0.0.0.0:5000".parse().unwrap())
//!         .readiness(readiness)
//!         .serve(router)
//!         .await
//!         .unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod readiness;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod greeting;
pub mod health;
pub mod middleware;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, Handler, Next};
pub use method::Method;
pub use readiness::{Readiness, State};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
