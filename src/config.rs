//! Process configuration.
//!
//! Every setting is a command-line flag with an environment-variable
//! fallback, so the same binary runs from a shell or a container spec.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::middleware::{AccessLog, RequestId, TracingSink, WriterSink};

/// Where access records go.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AccessLogTarget {
    /// `tracing` events under the `access` target.
    Tracing,
    /// Plain lines on stderr.
    Stderr,
}

#[derive(Clone, Debug, Parser)]
#[command(name = "greetd", version, about = "Readiness-gated greeting service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: SocketAddr,

    /// Reuse an incoming X-Request-Id instead of generating one.
    #[arg(long, env = "TRUST_REQUEST_ID")]
    pub trust_request_id: bool,

    /// Seconds to wait for in-flight requests on shutdown.
    #[arg(long = "shutdown-timeout", env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    #[arg(long, env = "ACCESS_LOG", value_enum, default_value_t = AccessLogTarget::Tracing)]
    pub access_log: AccessLogTarget,
}

impl Config {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn request_id(&self) -> RequestId {
        RequestId::default().trust_incoming(self.trust_request_id)
    }

    pub fn access_log(&self) -> AccessLog {
        match self.access_log {
            AccessLogTarget::Tracing => AccessLog::new(TracingSink),
            AccessLogTarget::Stderr => AccessLog::new(WriterSink::stderr()),
        }
    }
}
