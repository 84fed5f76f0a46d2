//! The service's routing table.
//!
//! | Route | Chain |
//! |---|---|
//! | `GET /healthz` | `healthz` |
//! | `GET /` | `RequestId` → `AccessLog` → `index` |
//!
//! `/healthz` is deliberately bare: the orchestrator must be able to probe
//! readiness even when the logging path is broken.
//!
//! On `/` the id is assigned before the access log runs, so every access
//! record carries the id that went out in `X-Request-Id`. Swapping the two
//! leaves the id column empty.

use crate::greeting;
use crate::health;
use crate::middleware::{AccessLog, Middleware, RequestId};
use crate::readiness::Readiness;
use crate::router::Router;

/// Builds the router for the two service endpoints.
pub fn router(readiness: Readiness, request_id: RequestId, access_log: AccessLog) -> Router {
    Router::new()
        .get("/healthz", health::healthz(readiness.clone()))
        .get("/", request_id.wrap(access_log.wrap(greeting::index(readiness))))
}
