//! HTTP status codes as a typed enum.
//!
//! Only the codes this service answers with. Use [`Status`] anywhere a status
//! code is accepted: `Response::status()`, `Response::builder().status()`, or
//! as a bare handler return value.
//!
//! ```rust
//! use greetd::{Response, Status};
//!
//! Response::status(Status::ServiceUnavailable);
//!
//! Response::builder()
//!     .status(Status::InternalServerError)
//!     .text("Not ready yet, World!");
//! ```

/// Status codes emitted by the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,                  // 200
    NotFound,            // 404
    MethodNotAllowed,    // 405
    InternalServerError, // 500
    ServiceUnavailable,  // 503
}

impl Status {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok                  => 200,
            Self::NotFound            => 404,
            Self::MethodNotAllowed    => 405,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable  => 503,
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.as_u16()
    }
}
