//! Readiness flag shared between the lifecycle and the request path.
//!
//! The flag has two observable states and one direction of travel:
//!
//! ```text
//! NotReady ──set_ready()──▶ Ready ──set_not_ready()──▶ NotReady (terminal)
//! ```
//!
//! Once shutdown has cleared the flag it stays cleared for the rest of the
//! process; a later `set_ready()` is ignored. A fresh process starts over at
//! `NotReady`.
//!
//! Every request reads the flag. A read is one atomic load and never blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::info;

const STARTING: u8 = 0;
const READY: u8 = 1;
const DRAINING: u8 = 2;

/// Observable readiness state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    NotReady,
    Ready,
}

/// Cloneable handle to the readiness flag.
///
/// Clones share one flag. Hand a clone to each handler that needs it and one
/// to whatever drives startup and shutdown.
#[derive(Clone, Debug, Default)]
pub struct Readiness {
    phase: Arc<AtomicU8>,
}

impl Readiness {
    /// A new flag in the `NotReady` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the service ready. No-op if shutdown has already begun.
    pub fn set_ready(&self) {
        if self
            .phase
            .compare_exchange(STARTING, READY, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            info!("service ready");
        }
    }

    /// Marks the service not ready. Terminal for this process.
    pub fn set_not_ready(&self) {
        if self.phase.swap(DRAINING, Ordering::AcqRel) != DRAINING {
            info!("service no longer ready");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == READY
    }

    pub fn state(&self) -> State {
        if self.is_ready() { State::Ready } else { State::NotReady }
    }
}
