//! The greeting handler, gated on readiness.
//!
//! Shares the readiness flag with [`healthz`](crate::health::healthz) but
//! answers for humans: a body on both branches, and `500` rather than `503`
//! while the service is not ready.

use crate::handler::Handler;
use crate::readiness::Readiness;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

pub const GREETING: &str = "Hello, World!";
pub const NOT_READY: &str = "Not ready yet, World!";

/// Greeting handler bound to `readiness`.
pub fn index(readiness: Readiness) -> impl Handler {
    move |_req: Request| {
        let ready = readiness.is_ready();
        async move {
            if ready {
                Response::text(GREETING)
            } else {
                Response::builder()
                    .status(Status::InternalServerError)
                    .text(NOT_READY)
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
    async fn not_ready_then_hello() {
        let readiness = Readiness::new();
        let h = index(readiness.clone()).into_boxed_handler();

        let res = h.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), NOT_READY.as_bytes());

        readiness.set_ready();
        let res = h.call(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), GREETING.as_bytes());
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }
}
