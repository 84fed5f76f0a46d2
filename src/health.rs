//! Readiness probe handler.
//!
//! | Path | Ready | Not ready |
//! |---|---|---|
//! | `/healthz` | `200`, empty body | `503`, empty body |
//!
//! Meant for load balancers and process supervisors: status only, no body,
//! and nothing consulted beyond the readiness flag. Register it without
//! middleware so it keeps answering when logging is degraded.
//!
//! ```rust
//! use greetd::{Readiness, Router, health};
//!
//! let readiness = Readiness::new();
//! let app = Router::new().get("/healthz", health::healthz(readiness.clone()));
//! # let _ = app;
//! ```

use crate::handler::Handler;
use crate::readiness::Readiness;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Health-check handler bound to `readiness`.
pub fn healthz(readiness: Readiness) -> impl Handler {
    move |_req: Request| {
        let ready = readiness.is_ready();
        async move {
            if ready {
                Response::status(Status::Ok)
            } else {
                Response::status(Status::ServiceUnavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::ErasedHandler;
    use crate::method::Method;

    #[tokio::test]
    async fn unavailable_until_ready() {
        let readiness = Readiness::new();
        let h = healthz(readiness.clone()).into_boxed_handler();

        let res = h.call(Request::new(Method::Get, "/healthz")).await;
        assert_eq!(res.status_code(), 503);
        assert!(res.body().is_empty());

        readiness.set_ready();
        let res = h.call(Request::new(Method::Get, "/healthz")).await;
        assert_eq!(res.status_code(), 200);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn unavailable_again_after_shutdown() {
        let readiness = Readiness::new();
        readiness.set_ready();
        let h = healthz(readiness.clone()).into_boxed_handler();
        readiness.set_not_ready();

        let res = h.call(Request::new(Method::Get, "/healthz")).await;
        assert_eq!(res.status_code(), 503);
    }
}
